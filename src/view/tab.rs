use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Panels selectable under the price header. Only `Overview` carries
/// fetched data beyond the header itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    Fundamentals,
    News,
    Sentiments,
    Team,
    Technicals,
    Tokenomics,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown tab '{0}' (expected one of: overview, fundamentals, news, sentiments, team, technicals, tokenomics)")]
pub struct UnknownTab(pub String);

impl Tab {
    pub const ALL: [Tab; 7] = [
        Tab::Overview,
        Tab::Fundamentals,
        Tab::News,
        Tab::Sentiments,
        Tab::Team,
        Tab::Technicals,
        Tab::Tokenomics,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Tab::Overview => "overview",
            Tab::Fundamentals => "fundamentals",
            Tab::News => "news",
            Tab::Sentiments => "sentiments",
            Tab::Team => "team",
            Tab::Technicals => "technicals",
            Tab::Tokenomics => "tokenomics",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Fundamentals => "Fundamentals",
            Tab::News => "News Insights",
            Tab::Sentiments => "Sentiments",
            Tab::Team => "Team",
            Tab::Technicals => "Technicals",
            Tab::Tokenomics => "Tokenomics",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tab {
    type Err = UnknownTab;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Tab::ALL
            .into_iter()
            .find(|tab| tab.key() == wanted || tab.label().to_ascii_lowercase() == wanted)
            .ok_or_else(|| UnknownTab(s.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keys_and_labels() {
        assert_eq!("overview".parse::<Tab>(), Ok(Tab::Overview));
        assert_eq!(" Tokenomics ".parse::<Tab>(), Ok(Tab::Tokenomics));
        assert_eq!("news".parse::<Tab>(), Ok(Tab::News));
        assert_eq!("News Insights".parse::<Tab>(), Ok(Tab::News));
    }

    #[test]
    fn every_tab_round_trips_through_its_key() {
        for tab in Tab::ALL {
            assert_eq!(tab.key().parse::<Tab>(), Ok(tab));
        }
    }

    #[test]
    fn rejects_unknown_tab() {
        assert_eq!("prices".parse::<Tab>(), Err(UnknownTab("prices".to_string())));
    }
}
