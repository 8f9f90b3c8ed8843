use crate::core::availability::check_all;
use crate::domain::model::{
    normalize, AvailabilityCheck, AvailabilityReport, CartSnapshot, Domain, PurchaseReceipt,
    Rejection, RemovalSummary,
};
use crate::domain::ports::{AvailabilityOracle, Clipboard};
use crate::utils::error::{CartError, Result};
use std::time::Duration;

/// 購物車狀態與所有修改操作。
///
/// 清單中的域名不重複且後綴合法；`generation` 在每次修改後遞增，
/// 用來判斷可用性查詢回來時清單是否已經變動。
#[derive(Debug, Clone)]
pub struct CartManager {
    domains: Vec<Domain>,
    pending_input: String,
    required_count: usize,
    generation: u64,
}

impl CartManager {
    pub fn new(required_count: usize) -> Self {
        Self {
            domains: Vec::new(),
            pending_input: String::new(),
            required_count,
            generation: 0,
        }
    }

    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn required_count(&self) -> usize {
        self.required_count
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    pub fn set_pending_input(&mut self, text: impl Into<String>) {
        self.pending_input = text.into();
    }

    /// 送出輸入框內容；被拒絕時輸入框保持不變
    pub fn submit_pending_input(&mut self) -> std::result::Result<Domain, Rejection> {
        let raw = self.pending_input.clone();
        self.add_domain(&raw)
    }

    pub fn add_domain(&mut self, raw: &str) -> std::result::Result<Domain, Rejection> {
        let name = normalize(raw);
        if name.is_empty() {
            return Err(Rejection::EmptyInput);
        }
        if self.domains.iter().any(|d| d.as_str() == name) {
            tracing::debug!("Rejected duplicate {}", name);
            return Err(Rejection::DuplicateEntry(name));
        }

        let domain = Domain::parse(&name).inspect_err(|reason| {
            tracing::debug!("Rejected {}: {}", name, reason);
        })?;

        self.domains.push(domain.clone());
        self.pending_input.clear();
        self.touch();
        tracing::debug!("Added {} ({}/{})", domain, self.len(), self.required_count);
        Ok(domain)
    }

    pub fn delete_domain(&mut self, name: &str) -> bool {
        let name = normalize(name);
        match self.domains.iter().position(|d| d.as_str() == name) {
            Some(index) => {
                let removed = self.domains.remove(index);
                self.touch();
                tracing::debug!("Deleted {}", removed);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        if self.domains.is_empty() {
            return;
        }
        tracing::debug!("Cleared {} domains", self.domains.len());
        self.domains.clear();
        self.touch();
    }

    pub fn begin_availability_check(&self) -> AvailabilityCheck {
        AvailabilityCheck {
            generation: self.generation,
            domains: self.domains.clone(),
        }
    }

    /// 套用查詢結果。
    ///
    /// 只移除結果明確為 `Unavailable` 且仍在清單中的域名；查詢期間新增的域名
    /// 與查詢失敗的域名都會保留，原本的相對順序不變。
    pub fn apply_availability(&mut self, report: AvailabilityReport) -> RemovalSummary {
        let stale = report.check.generation != self.generation;
        if stale {
            tracing::info!(
                "Cart changed during availability check (generation {} -> {}), re-validating",
                report.check.generation,
                self.generation
            );
        }

        let unavailable: Vec<&Domain> = report.unavailable().collect();
        let mut removed = Vec::new();
        self.domains.retain(|domain| {
            if unavailable.contains(&domain) {
                removed.push(domain.clone());
                false
            } else {
                true
            }
        });

        let unknown: Vec<Domain> = report
            .unknown()
            .filter(|d| self.domains.contains(*d))
            .cloned()
            .collect();

        if !removed.is_empty() {
            self.touch();
        }

        tracing::info!(
            "Availability check removed {} domains, {} unknown",
            removed.len(),
            unknown.len()
        );

        RemovalSummary {
            removed,
            unknown,
            stale,
        }
    }

    pub async fn remove_unavailable(
        &mut self,
        oracle: &dyn AvailabilityOracle,
        timeout: Option<Duration>,
    ) -> RemovalSummary {
        let check = self.begin_availability_check();
        let results = check_all(oracle, &check.domains, timeout).await;
        self.apply_availability(AvailabilityReport { check, results })
    }

    pub fn clipboard_text(&self) -> String {
        self.domains
            .iter()
            .map(Domain::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub async fn copy_to_clipboard(&self, clipboard: &dyn Clipboard) -> Result<String> {
        let text = self.clipboard_text();
        clipboard.write_text(&text).await?;
        tracing::debug!("Copied {} domains to clipboard", self.len());
        Ok(text)
    }

    /// 依 (後綴優先序, 長度) 穩定排序後只保留前 `required_count` 個，回傳被捨棄的域名
    pub fn keep_best(&mut self) -> Vec<Domain> {
        self.domains.sort_by_key(Domain::rank);
        let discarded = if self.domains.len() > self.required_count {
            self.domains.split_off(self.required_count)
        } else {
            Vec::new()
        };
        self.touch();
        tracing::debug!(
            "Kept best {} domains, discarded {}",
            self.domains.len(),
            discarded.len()
        );
        discarded
    }

    pub fn can_purchase(&self) -> bool {
        self.domains.len() == self.required_count
    }

    pub fn purchase(&self) -> Result<PurchaseReceipt> {
        if !self.can_purchase() {
            return Err(CartError::PurchaseNotAllowed {
                count: self.domains.len(),
                required: self.required_count,
            });
        }

        tracing::info!("🛒 Purchased {} domains", self.domains.len());
        Ok(PurchaseReceipt {
            domains: self.domains.clone(),
            purchased_at: chrono::Utc::now(),
        })
    }

    pub fn status_line(&self) -> String {
        format!(
            "{} out of {} domains added.",
            self.domains.len(),
            self.required_count
        )
    }

    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            domains: self.domains.clone(),
            count: self.domains.len(),
            required_count: self.required_count,
            can_purchase: self.can_purchase(),
        }
    }

    fn touch(&mut self) {
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Availability;
    use std::sync::Mutex;

    fn cart_with(required: usize, names: &[&str]) -> CartManager {
        let mut cart = CartManager::new(required);
        for name in names {
            cart.add_domain(name).unwrap();
        }
        cart
    }

    fn names(cart: &CartManager) -> Vec<&str> {
        cart.domains().iter().map(Domain::as_str).collect()
    }

    #[derive(Default)]
    struct RecordingClipboard {
        text: Mutex<Option<String>>,
    }

    #[async_trait::async_trait]
    impl Clipboard for RecordingClipboard {
        async fn write_text(&self, text: &str) -> Result<()> {
            *self.text.lock().unwrap() = Some(text.to_string());
            Ok(())
        }
    }

    struct BrokenClipboard;

    #[async_trait::async_trait]
    impl Clipboard for BrokenClipboard {
        async fn write_text(&self, _text: &str) -> Result<()> {
            Err(CartError::ClipboardError {
                message: "no display".to_string(),
            })
        }
    }

    #[test]
    fn test_add_normalizes_and_deduplicates() {
        let mut cart = CartManager::new(5);
        cart.add_domain("EXAMPLE.COM").unwrap();

        assert_eq!(
            cart.add_domain(" example.com "),
            Err(Rejection::DuplicateEntry("example.com".to_string()))
        );
        assert_eq!(names(&cart), vec!["example.com"]);
    }

    #[test]
    fn test_add_rejections_leave_state_unchanged() {
        let mut cart = cart_with(5, &["a.com"]);
        let generation = cart.generation();

        assert_eq!(cart.add_domain("  "), Err(Rejection::EmptyInput));
        assert!(matches!(
            cart.add_domain("example.net"),
            Err(Rejection::InvalidSuffix(_))
        ));
        assert_eq!(names(&cart), vec!["a.com"]);
        assert_eq!(cart.generation(), generation);
    }

    #[test]
    fn test_pending_input_cleared_only_on_success() {
        let mut cart = CartManager::new(5);

        cart.set_pending_input("bad.net");
        assert!(cart.submit_pending_input().is_err());
        assert_eq!(cart.pending_input(), "bad.net");

        cart.set_pending_input("Good.App");
        assert_eq!(cart.submit_pending_input().unwrap().as_str(), "good.app");
        assert_eq!(cart.pending_input(), "");
    }

    #[test]
    fn test_delete_domain() {
        let mut cart = cart_with(5, &["a.com", "b.xyz"]);

        assert!(cart.delete_domain("A.com"));
        assert!(!cart.delete_domain("missing.com"));
        assert_eq!(names(&cart), vec!["b.xyz"]);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut cart = CartManager::new(5);
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.generation(), 0);

        let mut cart = cart_with(5, &["a.com", "b.com"]);
        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_keep_best_sorts_and_truncates() {
        let mut cart = cart_with(2, &["b.xyz", "a.com", "ab.com", "z.app"]);

        let discarded = cart.keep_best();

        assert_eq!(names(&cart), vec!["a.com", "ab.com"]);
        let discarded: Vec<&str> = discarded.iter().map(Domain::as_str).collect();
        assert_eq!(discarded, vec!["z.app", "b.xyz"]);
    }

    #[test]
    fn test_keep_best_ties_keep_insertion_order() {
        let mut cart = cart_with(5, &["bb.com", "aa.com", "c.xyz", "d.app"]);

        let discarded = cart.keep_best();

        assert!(discarded.is_empty());
        assert_eq!(names(&cart), vec!["bb.com", "aa.com", "d.app", "c.xyz"]);
    }

    #[test]
    fn test_purchase_gating() {
        let mut cart = cart_with(5, &["a.com", "b.com", "c.com", "d.com"]);
        assert!(!cart.can_purchase());
        assert!(matches!(
            cart.purchase(),
            Err(CartError::PurchaseNotAllowed {
                count: 4,
                required: 5
            })
        ));

        cart.add_domain("e.com").unwrap();
        assert!(cart.can_purchase());
        let receipt = cart.purchase().unwrap();
        assert_eq!(receipt.domains.len(), 5);
        assert_eq!(cart.len(), 5);
    }

    #[tokio::test]
    async fn test_clipboard_text() {
        let cart = cart_with(5, &["a.com", "b.xyz"]);
        let clipboard = RecordingClipboard::default();

        let text = cart.copy_to_clipboard(&clipboard).await.unwrap();

        assert_eq!(text, "a.com, b.xyz");
        assert_eq!(
            clipboard.text.lock().unwrap().as_deref(),
            Some("a.com, b.xyz")
        );
        assert_eq!(CartManager::new(5).clipboard_text(), "");
    }

    #[tokio::test]
    async fn test_clipboard_failure_is_reported() {
        let cart = cart_with(5, &["a.com"]);
        assert!(matches!(
            cart.copy_to_clipboard(&BrokenClipboard).await,
            Err(CartError::ClipboardError { .. })
        ));
    }

    #[test]
    fn test_apply_availability_on_unchanged_cart() {
        let mut cart = cart_with(5, &["a.com", "b.com", "c.com"]);
        let check = cart.begin_availability_check();

        let summary = cart.apply_availability(AvailabilityReport {
            check,
            results: vec![
                Availability::Available,
                Availability::Unavailable,
                Availability::Available,
            ],
        });

        assert_eq!(names(&cart), vec!["a.com", "c.com"]);
        assert!(!summary.stale);
        assert_eq!(summary.removed.len(), 1);
    }

    #[test]
    fn test_apply_availability_keeps_unknown() {
        let mut cart = cart_with(5, &["a.com", "b.com"]);
        let check = cart.begin_availability_check();

        let summary = cart.apply_availability(AvailabilityReport {
            check,
            results: vec![Availability::Unknown, Availability::Unavailable],
        });

        assert_eq!(names(&cart), vec!["a.com"]);
        let unknown: Vec<&str> = summary.unknown.iter().map(Domain::as_str).collect();
        assert_eq!(unknown, vec!["a.com"]);
    }

    #[test]
    fn test_apply_availability_after_concurrent_edits() {
        let mut cart = cart_with(5, &["a.com", "b.com", "c.com"]);
        let check = cart.begin_availability_check();

        // 查詢進行中使用者又修改了清單
        cart.add_domain("d.com").unwrap();
        cart.delete_domain("a.com");

        let summary = cart.apply_availability(AvailabilityReport {
            check,
            results: vec![
                Availability::Unavailable,
                Availability::Unavailable,
                Availability::Available,
            ],
        });

        assert!(summary.stale);
        assert_eq!(names(&cart), vec!["c.com", "d.com"]);
        let removed: Vec<&str> = summary.removed.iter().map(Domain::as_str).collect();
        assert_eq!(removed, vec!["b.com"]);
    }

    #[test]
    fn test_snapshot_serializes() {
        let cart = cart_with(1, &["a.com"]);
        let json = serde_json::to_value(cart.snapshot()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "domains": ["a.com"],
                "count": 1,
                "required_count": 1,
                "can_purchase": true
            })
        );
    }

    #[test]
    fn test_status_line() {
        let cart = cart_with(5, &["a.com", "b.com"]);
        assert_eq!(cart.status_line(), "2 out of 5 domains added.");
    }
}
