use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Story length offered to parents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum ReadingTime {
    #[display("5")]
    #[serde(rename = "5")]
    Five,
    #[display("10")]
    #[serde(rename = "10")]
    Ten,
    #[display("15")]
    #[serde(rename = "15")]
    Fifteen,
    #[display("20")]
    #[serde(rename = "20")]
    Twenty,
    #[display("20+")]
    #[serde(rename = "20+")]
    TwentyPlus,
}

impl ReadingTime {
    pub const ALL: [ReadingTime; 5] = [
        ReadingTime::Five,
        ReadingTime::Ten,
        ReadingTime::Fifteen,
        ReadingTime::Twenty,
        ReadingTime::TwentyPlus,
    ];

    #[inline]
    pub const fn code(&self) -> &'static str {
        use ReadingTime::*;
        match self {
            Five => "5",
            Ten => "10",
            Fifteen => "15",
            Twenty => "20",
            TwentyPlus => "20+",
        }
    }

    pub fn label(&self) -> String {
        format!("{} minutes", self.code())
    }
}

impl FromStr for ReadingTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ReadingTime::ALL
            .into_iter()
            .find(|t| t.code() == trimmed)
            .ok_or_else(|| format!("unknown reading time: {}", trimmed))
    }
}
