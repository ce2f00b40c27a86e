use std::fmt::{self, Write};

use crate::projection::{self, CoinRow, PriceView};
use crate::state::snapshot::DashboardSnapshot;
use crate::view::chart::{ChartConfig, ChartHandle, ChartRegistry};
use crate::view::panels;
use crate::view::tab::Tab;

/// How many coins the sidebar shows.
const SIDEBAR_COINS: usize = 3;
const CARD_WIDTH: usize = 18;
const RULE_WIDTH: usize = 80;

/// The mounted dashboard. Owns the chart widget for as long as it lives.
pub struct DashboardView {
    chart: ChartHandle,
}

impl DashboardView {
    pub fn mount(registry: &ChartRegistry, chart_symbol: &str) -> Self {
        Self {
            chart: registry.mount(ChartConfig::new(chart_symbol)),
        }
    }

    pub fn chart(&self) -> &ChartHandle {
        &self.chart
    }

    /// Renders one full frame. `None` means no cycle has succeeded yet.
    pub fn render(&self, snapshot: Option<&DashboardSnapshot>, tab: Tab) -> String {
        Frame { view: self, snapshot, tab }.to_string()
    }
}

struct Frame<'a> {
    view: &'a DashboardView,
    snapshot: Option<&'a DashboardSnapshot>,
    tab: Tab,
}

impl fmt::Display for Frame<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self
            .snapshot
            .map(|s| projection::project_coins(&s.trending))
            .unwrap_or_default();

        write_header(f, self.snapshot)?;
        rule(f)?;
        write_tabs(f, self.tab)?;
        rule(f)?;

        match self.tab {
            Tab::Overview => {
                write_chart(f, self.view.chart.config())?;
                writeln!(f)?;
                panels::write_performance(f)?;
                writeln!(f)?;
                panels::write_about(f)?;
            }
            Tab::Fundamentals => panels::write_performance(f)?,
            Tab::Tokenomics => panels::write_tokenomics(f)?,
            other => panels::write_empty(f, other)?,
        }

        rule(f)?;
        write_trending(f, &rows)?;
        writeln!(f)?;
        write_carousel(f, "You May Also Like", &rows)?;
        writeln!(f)?;
        write_carousel(f, "Trending Coins", &rows)
    }
}

fn rule(out: &mut impl Write) -> fmt::Result {
    writeln!(out, "{}", "─".repeat(RULE_WIDTH))
}

fn write_header(out: &mut impl Write, snapshot: Option<&DashboardSnapshot>) -> fmt::Result {
    writeln!(out, "Bitcoin  BTC")?;

    let Some(snapshot) = snapshot else {
        return writeln!(out, "  Loading prices...");
    };

    let PriceView { usd, inr, change } = projection::project_price(&snapshot.prices);
    writeln!(out, "  ${usd}  {} {}%", change.arrow(), change.display)?;
    writeln!(out, "  ₹{inr}")?;
    writeln!(out, "  updated {}", snapshot.fetched_at.format("%Y-%m-%d %H:%M:%S UTC"))
}

fn write_tabs(out: &mut impl Write, active: Tab) -> fmt::Result {
    let labels: Vec<String> = Tab::ALL
        .into_iter()
        .map(|tab| {
            if tab == active {
                format!("[{}]", tab.label())
            } else {
                tab.label().to_string()
            }
        })
        .collect();
    writeln!(out, "{}", labels.join("  "))
}

fn write_chart(out: &mut impl Write, config: &ChartConfig) -> fmt::Result {
    writeln!(out, "Chart  {} ({})", config.qualified_symbol(), config.interval)?;
    writeln!(out, "  {}", config.embed_url())
}

fn write_trending(out: &mut impl Write, rows: &[CoinRow]) -> fmt::Result {
    writeln!(out, "Trending Coins (24h)")?;
    if rows.is_empty() {
        return writeln!(out, "  -");
    }
    for row in rows.iter().take(SIDEBAR_COINS) {
        writeln!(out, "  {:<10} {} {}%", row.symbol, row.change.arrow(), row.change.display)?;
    }
    Ok(())
}

/// One horizontal strip of coin cards, each coin's name and sparkline link
/// listed below it.
fn write_carousel(out: &mut impl Write, title: &str, rows: &[CoinRow]) -> fmt::Result {
    writeln!(out, "{title}")?;
    if rows.is_empty() {
        return writeln!(out, "  -");
    }

    let cards: Vec<String> = rows
        .iter()
        .map(|row| {
            let card = format!("{} {} {}%", row.symbol, row.change.arrow(), row.change.display);
            format!("[{card:<w$}]", w = CARD_WIDTH)
        })
        .collect();
    writeln!(out, "  {}", cards.join(" "))?;

    for row in rows {
        if row.name.is_empty() && row.sparkline.is_none() {
            continue;
        }
        write!(out, "    {:<8}{}", row.symbol, row.name)?;
        if let Some(sparkline) = &row.sparkline {
            write!(out, "  7d: {sparkline}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::types::{BitcoinQuote, PriceSnapshot, TrendingCoin, TrendingData, TrendingItem};
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;

    fn coin(id: &str, symbol: &str, usd_change: f64, sparkline: Option<&str>) -> TrendingCoin {
        TrendingCoin {
            item: TrendingItem {
                id: id.to_string(),
                name: format!("{id}-coin"),
                symbol: symbol.to_string(),
                sparkline: sparkline.map(str::to_string),
                data: Some(TrendingData {
                    price: None,
                    price_change_percentage_24h: Some(HashMap::from([("usd".to_string(), usd_change)])),
                }),
                ..Default::default()
            },
        }
    }

    fn snapshot(trending: Vec<TrendingCoin>) -> DashboardSnapshot {
        DashboardSnapshot {
            sequence: 1,
            fetched_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            prices: PriceSnapshot {
                bitcoin: BitcoinQuote {
                    usd: 45000.0,
                    usd_24h_change: -2.5,
                    inr: 3_700_000.0,
                    inr_24h_change: -2.3,
                },
            },
            trending,
        }
    }

    #[test]
    fn header_shows_fetched_prices_and_change() {
        let registry = ChartRegistry::new();
        let view = DashboardView::mount(&registry, "BTCUSD");
        let frame = view.render(Some(&snapshot(Vec::new())), Tab::Overview);

        assert!(frame.contains("$45,000  ▼ 2.50%"), "{frame}");
        assert!(frame.contains("₹3,700,000"), "{frame}");
        assert!(frame.contains("updated 2024-03-01 12:00:00 UTC"));
        // The INR change is fetched but not displayed.
        assert!(!frame.contains("2.30"));
    }

    #[test]
    fn loading_state_before_first_snapshot() {
        let view = DashboardView::mount(&ChartRegistry::new(), "BTCUSD");
        let frame = view.render(None, Tab::Overview);
        assert!(frame.contains("Loading prices..."));
        assert!(!frame.contains('₹'));
        assert!(frame.contains("Trending Coins (24h)\n  -\n"));
    }

    #[test]
    fn trending_row_shows_symbol_arrow_and_change() {
        let view = DashboardView::mount(&ChartRegistry::new(), "BTCUSD");
        let frame = view.render(Some(&snapshot(vec![coin("x", "xyz", 5.1, None)])), Tab::Overview);
        assert!(frame.contains("XYZ        ▲ 5.10%"), "{frame}");
        assert!(frame.contains("[XYZ ▲ 5.10%"), "{frame}");
    }

    #[test]
    fn sidebar_shows_first_three_but_carousels_show_all() {
        let coins = vec![
            coin("a", "aaa", 1.0, None),
            coin("b", "bbb", -1.0, None),
            coin("c", "ccc", 2.0, None),
            coin("d", "ddd", -3.0, Some("https://example.test/d.svg")),
        ];
        let view = DashboardView::mount(&ChartRegistry::new(), "BTCUSD");
        let frame = view.render(Some(&snapshot(coins)), Tab::News);

        assert!(!frame.contains("DDD        ▼ 3.00%"));
        assert!(frame.contains("CCC        ▲ 2.00%"));
        assert_eq!(frame.matches("[DDD ▼ 3.00%").count(), 2);
        assert_eq!(frame.matches("    DDD     d-coin  7d: https://example.test/d.svg\n").count(), 2);
        assert_eq!(frame.matches("    AAA     a-coin\n").count(), 2);
    }

    #[test]
    fn tab_selects_panel() {
        let view = DashboardView::mount(&ChartRegistry::new(), "BTCUSD");
        let snap = snapshot(Vec::new());

        let overview = view.render(Some(&snap), Tab::Overview);
        assert!(overview.contains("[Overview]"));
        assert!(overview.contains("Chart  BINANCE:BTCUSD (D)"));
        assert!(overview.contains("About Bitcoin"));

        let tokenomics = view.render(Some(&snap), Tab::Tokenomics);
        assert!(tokenomics.contains("[Tokenomics]"));
        assert!(tokenomics.contains("Crowdsale investors"));
        assert!(!tokenomics.contains("Chart  BINANCE"));

        let team = view.render(Some(&snap), Tab::Team);
        assert!(team.contains("Nothing to show here yet."));
        // The header still reflects fetched data on every tab.
        assert!(team.contains("$45,000"));
    }

    #[test]
    fn view_releases_chart_on_drop() {
        let registry = ChartRegistry::new();
        let view = DashboardView::mount(&registry, "ETHUSD");
        assert_eq!(registry.mounted(), 1);
        assert_eq!(view.chart().config().symbol, "ETHUSD");
        drop(view);
        assert_eq!(registry.mounted(), 0);
    }
}
