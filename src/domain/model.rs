use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// 可接受的頂級後綴，依排序優先順序排列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suffix {
    Com,
    App,
    Xyz,
}

impl Suffix {
    pub const ALL: [Suffix; 3] = [Suffix::Com, Suffix::App, Suffix::Xyz];

    pub fn as_str(&self) -> &'static str {
        match self {
            Suffix::Com => ".com",
            Suffix::App => ".app",
            Suffix::Xyz => ".xyz",
        }
    }

    /// keep-best 排序的主鍵，數字越小越好
    pub fn priority(&self) -> u8 {
        match self {
            Suffix::Com => 1,
            Suffix::App => 2,
            Suffix::Xyz => 3,
        }
    }

    /// 依結尾判斷後綴
    pub fn classify(name: &str) -> Option<Suffix> {
        Self::ALL
            .into_iter()
            .find(|suffix| name.ends_with(suffix.as_str()))
    }
}

impl fmt::Display for Suffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 加入購物車被拒絕的原因
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("domain name is empty")]
    EmptyInput,

    #[error("{0} is already in the cart")]
    DuplicateEntry(String),

    #[error("{0} must end with .com, .app or .xyz")]
    InvalidSuffix(String),
}

/// 已驗證的域名：去除空白、小寫、後綴合法
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct Domain {
    name: String,
    suffix: Suffix,
}

impl Domain {
    /// 只做格式驗證；重複檢查由購物車負責
    pub fn parse(raw: &str) -> std::result::Result<Self, Rejection> {
        let name = normalize(raw);
        if name.is_empty() {
            return Err(Rejection::EmptyInput);
        }

        match Suffix::classify(&name) {
            Some(suffix) => Ok(Self { name, suffix }),
            None => Err(Rejection::InvalidSuffix(name)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn suffix(&self) -> Suffix {
        self.suffix
    }

    /// 以字元數計算長度
    pub fn len(&self) -> usize {
        self.name.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }

    pub(crate) fn rank(&self) -> (u8, usize) {
        (self.suffix.priority(), self.len())
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<Domain> for String {
    fn from(domain: Domain) -> Self {
        domain.name
    }
}

impl PartialEq<str> for Domain {
    fn eq(&self, other: &str) -> bool {
        self.name == other
    }
}

impl PartialEq<&str> for Domain {
    fn eq(&self, other: &&str) -> bool {
        self.name == *other
    }
}

/// trim + lowercase，所有比對都以此為準
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// 單一域名的查詢結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Available,
    Unavailable,
    /// 查詢失敗或逾時
    Unknown,
}

impl From<bool> for Availability {
    fn from(available: bool) -> Self {
        if available {
            Availability::Available
        } else {
            Availability::Unavailable
        }
    }
}

/// 開始查詢時的購物車快照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityCheck {
    pub generation: u64,
    pub domains: Vec<Domain>,
}

/// 查詢結果，順序與快照一致
#[derive(Debug, Clone)]
pub struct AvailabilityReport {
    pub check: AvailabilityCheck,
    pub results: Vec<Availability>,
}

impl AvailabilityReport {
    pub fn unavailable(&self) -> impl Iterator<Item = &Domain> {
        self.entries()
            .filter(|(_, availability)| *availability == Availability::Unavailable)
            .map(|(domain, _)| domain)
    }

    pub fn unknown(&self) -> impl Iterator<Item = &Domain> {
        self.entries()
            .filter(|(_, availability)| *availability == Availability::Unknown)
            .map(|(domain, _)| domain)
    }

    fn entries(&self) -> impl Iterator<Item = (&Domain, Availability)> {
        self.check
            .domains
            .iter()
            .zip(self.results.iter().copied())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalSummary {
    pub removed: Vec<Domain>,
    /// 查詢失敗，保守地留在購物車內
    pub unknown: Vec<Domain>,
    /// 查詢期間購物車已被修改
    pub stale: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PurchaseReceipt {
    pub domains: Vec<Domain>,
    pub purchased_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CartSnapshot {
    pub domains: Vec<Domain>,
    pub count: usize,
    pub required_count: usize,
    pub can_purchase: bool,
}
