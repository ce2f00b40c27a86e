use std::fmt::{self, Write};

use crate::view::tab::Tab;

// Reference figures shown on the overview/fundamentals panels. These are
// not fetched.
const TODAY_RANGE: (&str, &str) = ("$45,444", "$49,343");
const YEAR_RANGE: (&str, &str) = ("$16,930", "$49,343");
const MARKET_STATS: [(&str, &str); 3] = [
    ("Market Cap", "$876,524,315,562"),
    ("Volume (24h)", "$23,235,662,344"),
    ("Circulating Supply", "19,000,000 BTC"),
];
const DISTRIBUTION: [(&str, u8); 2] = [("Crowdsale investors", 80), ("Foundation", 20)];

const ABOUT: &str = "Bitcoin's price today is US$16,951.82, with a 24-hour trading volume of $19.14 B. \
BTC is +0.36% in the last 24 hours. It is currently -7.70% from its 7-day all-time high of $18,366.66, \
and 3.40% from its 7-day all-time low of $16,394.75. BTC has a circulating supply of 19.24 M BTC and a \
max supply of 21 M BTC.";

const BAR_WIDTH: usize = 40;

pub fn write_performance(out: &mut impl Write) -> fmt::Result {
    writeln!(out, "Performance")?;
    write_range(out, "Today's Low", "Today's High", TODAY_RANGE)?;
    write_range(out, "52W Low", "52W High", YEAR_RANGE)?;
    writeln!(out)?;
    for (label, value) in MARKET_STATS {
        writeln!(out, "  {label:<22}{value:>24}")?;
    }
    Ok(())
}

fn write_range(out: &mut impl Write, low: &str, high: &str, values: (&str, &str)) -> fmt::Result {
    let width = BAR_WIDTH + 4;
    writeln!(out, "  {low:<w$}{high}", w = width - high.len())?;
    writeln!(out, "  [{}]", "=".repeat(BAR_WIDTH))?;
    writeln!(out, "  {:<w$}{}", values.0, values.1, w = width - values.1.len())
}

pub fn write_tokenomics(out: &mut impl Write) -> fmt::Result {
    writeln!(out, "Tokenomics")?;
    writeln!(out, "  Initial Distribution")?;
    for (holder, pct) in DISTRIBUTION {
        let filled = BAR_WIDTH * usize::from(pct) / 100;
        writeln!(out, "  {holder:<20} {pct:>3}%  {}", "#".repeat(filled))?;
    }
    Ok(())
}

pub fn write_about(out: &mut impl Write) -> fmt::Result {
    writeln!(out, "About Bitcoin")?;
    writeln!(out, "  What is Bitcoin?")?;
    for line in wrap(ABOUT, 76) {
        writeln!(out, "  {line}")?;
    }
    Ok(())
}

/// Placeholder for tabs that have no content of their own.
pub fn write_empty(out: &mut impl Write, tab: Tab) -> fmt::Result {
    writeln!(out, "{}", tab.label())?;
    writeln!(out, "  Nothing to show here yet.")
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn performance_lists_market_stats() {
        let mut out = String::new();
        write_performance(&mut out).unwrap();
        assert!(out.contains("Today's Low"));
        assert!(out.contains("$876,524,315,562"));
        assert!(out.contains("19,000,000 BTC"));
    }

    #[test]
    fn tokenomics_bars_match_shares() {
        let mut out = String::new();
        write_tokenomics(&mut out).unwrap();
        assert!(out.contains(&format!("80%  {}", "#".repeat(32))));
        assert!(out.contains(&format!("20%  {}", "#".repeat(8))));
    }

    #[test]
    fn wrap_respects_width() {
        let lines = wrap(ABOUT, 30);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.len() <= 30));
        assert_eq!(lines.join(" "), ABOUT.split_whitespace().collect::<Vec<_>>().join(" "));
    }
}
