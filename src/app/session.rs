use crate::app::intent::{Intent, HELP};
use crate::core::availability::check_all;
use crate::core::cart::CartManager;
use crate::domain::model::{normalize, AvailabilityReport, Domain, RemovalSummary};
use crate::domain::ports::{AvailabilityOracle, Clipboard};
use crate::utils::error::Result;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinError;

type CheckOutcome = std::result::Result<AvailabilityReport, JoinError>;

enum Flow {
    Continue,
    Quit,
}

/// 互動式購物車：逐行讀取指令、更新購物車、重新輸出畫面。
///
/// 可用性查詢在背景 task 中進行，查詢期間仍可繼續輸入指令；
/// 結果回來後才套用到購物車。
pub struct CartSession {
    cart: CartManager,
    oracle: Arc<dyn AvailabilityOracle>,
    clipboard: Arc<dyn Clipboard>,
    lookup_timeout: Option<Duration>,
    check_in_flight: bool,
}

impl CartSession {
    pub fn new(
        cart: CartManager,
        oracle: Arc<dyn AvailabilityOracle>,
        clipboard: Arc<dyn Clipboard>,
        lookup_timeout: Option<Duration>,
    ) -> Self {
        Self {
            cart,
            oracle,
            clipboard,
            lookup_timeout,
            check_in_flight: false,
        }
    }

    pub fn cart(&self) -> &CartManager {
        &self.cart
    }

    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let (tx, mut outcomes) = mpsc::unbounded_channel::<CheckOutcome>();
        // 逐行讀取原始位元組，非 UTF-8 的行只拒絕該行
        let mut lines = input.split(b'\n');

        writeln!(out, "Shopping Cart (type `help` for commands)")?;
        self.render(out)?;

        loop {
            tokio::select! {
                Some(outcome) = outcomes.recv() => {
                    self.finish_check(outcome, out)?;
                }
                segment = lines.next_segment() => {
                    let Some(bytes) = segment? else {
                        break;
                    };
                    let Ok(line) = String::from_utf8(bytes) else {
                        tracing::debug!("Rejected input line that is not valid UTF-8");
                        writeln!(out, "✗ input is not valid UTF-8")?;
                        continue;
                    };
                    if let Flow::Quit = self.handle(Intent::parse(&line), &tx, out).await? {
                        break;
                    }
                }
            }
        }

        // 離開前等待進行中的查詢；查詢 task 結束後 channel 會關閉
        drop(tx);
        if self.check_in_flight {
            writeln!(out, "… waiting for availability check to finish")?;
            if let Some(outcome) = outcomes.recv().await {
                self.finish_check(outcome, out)?;
            }
        }

        out.flush()?;
        Ok(())
    }

    async fn handle<W: Write>(
        &mut self,
        intent: Intent,
        tx: &mpsc::UnboundedSender<CheckOutcome>,
        out: &mut W,
    ) -> Result<Flow> {
        tracing::debug!("Intent: {:?}", intent);

        match intent {
            Intent::Add(raw) => {
                self.cart.set_pending_input(raw);
                match self.cart.submit_pending_input() {
                    Ok(domain) => writeln!(out, "✓ added {}", domain)?,
                    Err(reason) => writeln!(out, "✗ {}", reason)?,
                }
                self.render(out)?;
            }
            Intent::Delete(name) => {
                let name = normalize(&name);
                if self.cart.delete_domain(&name) {
                    writeln!(out, "✓ removed {}", name)?;
                } else {
                    writeln!(out, "✗ {} is not in the cart", name)?;
                }
                self.render(out)?;
            }
            Intent::Clear => {
                self.cart.clear();
                writeln!(out, "✓ cart cleared")?;
                self.render(out)?;
            }
            Intent::RemoveUnavailable => self.start_check(tx, out)?,
            Intent::Copy => match self.cart.copy_to_clipboard(self.clipboard.as_ref()).await {
                Ok(text) => writeln!(out, "✓ copied: {}", text)?,
                Err(e) => {
                    tracing::warn!("Clipboard write failed: {}", e);
                    writeln!(out, "✗ {}", e.user_friendly_message())?;
                }
            },
            Intent::KeepBest => {
                let discarded = self.cart.keep_best();
                if discarded.is_empty() {
                    writeln!(out, "✓ sorted by suffix and length")?;
                } else {
                    writeln!(out, "✓ discarded {}", join(&discarded))?;
                }
                self.render(out)?;
            }
            Intent::Purchase => match self.cart.purchase() {
                Ok(receipt) => {
                    writeln!(out, "Domains purchased!")?;
                    tracing::info!(
                        "Purchase confirmed at {} for {}",
                        receipt.purchased_at,
                        join(&receipt.domains)
                    );
                }
                Err(e) => writeln!(out, "✗ {}", e.user_friendly_message())?,
            },
            Intent::List => self.render(out)?,
            Intent::Export => {
                writeln!(out, "{}", serde_json::to_string_pretty(&self.cart.snapshot())?)?;
            }
            Intent::Help => writeln!(out, "{}", HELP)?,
            Intent::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    fn start_check<W: Write>(
        &mut self,
        tx: &mpsc::UnboundedSender<CheckOutcome>,
        out: &mut W,
    ) -> Result<()> {
        if self.check_in_flight {
            writeln!(out, "… availability check already running")?;
            return Ok(());
        }
        if self.cart.is_empty() {
            writeln!(out, "✗ cart is empty")?;
            return Ok(());
        }

        let check = self.cart.begin_availability_check();
        writeln!(out, "… checking {} domains", check.domains.len())?;
        tracing::info!(
            "🔍 Availability check started for {} domains",
            check.domains.len()
        );

        let oracle = Arc::clone(&self.oracle);
        let timeout = self.lookup_timeout;
        let tx = tx.clone();
        self.check_in_flight = true;

        let lookup = tokio::spawn(async move {
            let results = check_all(oracle.as_ref(), &check.domains, timeout).await;
            AvailabilityReport { check, results }
        });

        // JoinHandle 的結果（包含 panic）一定會送回 session
        tokio::spawn(async move {
            if tx.send(lookup.await).is_err() {
                tracing::debug!("Session ended before availability check finished");
            }
        });
        Ok(())
    }

    fn finish_check<W: Write>(&mut self, outcome: CheckOutcome, out: &mut W) -> Result<()> {
        self.check_in_flight = false;
        match outcome {
            Ok(report) => {
                let summary = self.cart.apply_availability(report);
                self.report_removal(&summary, out)?;
                self.render(out)
            }
            Err(e) => {
                tracing::error!("❌ Availability check task failed: {}", e);
                writeln!(out, "✗ availability check failed; cart unchanged")?;
                Ok(())
            }
        }
    }

    fn report_removal<W: Write>(&self, summary: &RemovalSummary, out: &mut W) -> Result<()> {
        if summary.removed.is_empty() {
            writeln!(out, "✓ all checked domains are available")?;
        } else {
            writeln!(out, "✓ removed unavailable: {}", join(&summary.removed))?;
        }
        if !summary.unknown.is_empty() {
            writeln!(out, "? could not check: {}", join(&summary.unknown))?;
        }
        if summary.stale {
            writeln!(out, "… cart changed during the check; newer entries were kept")?;
        }
        Ok(())
    }

    fn render<W: Write>(&self, out: &mut W) -> Result<()> {
        for (index, domain) in self.cart.domains().iter().enumerate() {
            writeln!(out, "  {}. {}", index + 1, domain)?;
        }
        let gate = if self.cart.can_purchase() {
            "purchase enabled"
        } else {
            "purchase disabled"
        };
        writeln!(out, "{} [{}]", self.cart.status_line(), gate)?;
        Ok(())
    }
}

fn join(domains: &[Domain]) -> String {
    domains
        .iter()
        .map(Domain::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
