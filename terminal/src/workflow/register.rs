use crate::feedback::ConsoleBell;
use crate::workflow::config::TerminalConfig;
use log::{info, warn};
use poscore::capture::{DecodeSender, RawDetection};
use poscore::detection::{RejectReason, Verdict};
use poscore::feedback::{FeedbackSink, SilentSink};
use poscore::pos::{settle, Cart, CartItem, ManualEntry, PaymentMethod, Pricebook, Receipt};
use poscore::session::SessionStatus;
use poscore::symbology::CanonicalBarcode;
use poscore::{PosResult, ScanSession, ScannerConfig};
use serde::Serialize;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// What happened to a confirmed barcode at the register.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScanOutcome {
    Added { item: CartItem },
    /// Not in the pricebook; the operator keys a manual entry next.
    NotFound { barcode: String },
}

/// Result of one decode attempt posted to the register.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DetectOutcome {
    Idle,
    Rejected { detail: RejectReason },
    Added { item: CartItem },
    NotFound { barcode: String },
}

impl From<ScanOutcome> for DetectOutcome {
    fn from(outcome: ScanOutcome) -> Self {
        match outcome {
            ScanOutcome::Added { item } => DetectOutcome::Added { item },
            ScanOutcome::NotFound { barcode } => DetectOutcome::NotFound { barcode },
        }
    }
}

struct ActiveScan {
    session: ScanSession,
    sender: DecodeSender,
}

/// Register state: pricebook, the sale in progress and the live scanner.
pub struct Register {
    pricebook: Pricebook,
    cart: Cart,
    scanner: ScannerConfig,
    audible: bool,
    active: Option<ActiveScan>,
    last_scanned: Option<String>,
}

impl Register {
    pub fn new(config: &TerminalConfig) -> Self {
        Self {
            pricebook: Pricebook::new(),
            cart: Cart::with_tax_rate(config.tax_rate),
            scanner: config.scanner.clone(),
            audible: config.audible,
            active: None,
            last_scanned: None,
        }
    }

    pub fn with_pricebook(mut self, pricebook: Pricebook) -> Self {
        self.pricebook = pricebook;
        self
    }

    pub fn pricebook(&self) -> &Pricebook {
        &self.pricebook
    }

    pub fn pricebook_mut(&mut self) -> &mut Pricebook {
        &mut self.pricebook
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    /// Opens a fresh scan session, discarding any previous one.
    pub fn start_scanning(&mut self) -> PosResult<()> {
        let sink: Box<dyn FeedbackSink> = if self.audible {
            Box::new(ConsoleBell::default())
        } else {
            Box::new(SilentSink)
        };
        let (session, sender) = ScanSession::open(&self.scanner, sink)?;
        self.active = Some(ActiveScan { session, sender });
        info!("scanner started");
        Ok(())
    }

    pub fn stop_scanning(&mut self) {
        if self.active.take().is_some() {
            info!("scanner stopped");
        }
    }

    pub fn is_scanning(&self) -> bool {
        self.active.is_some()
    }

    pub fn scanner_status(&self, now: Instant) -> Option<SessionStatus> {
        self.active.as_ref().map(|active| active.session.status(now))
    }

    /// Feeds one decode attempt through the live session.
    pub fn detect(&mut self, raw: RawDetection, now: Instant) -> DetectOutcome {
        let Some(active) = self.active.as_mut() else {
            return DetectOutcome::Idle;
        };
        if !active.sender.send(raw) {
            return DetectOutcome::Idle;
        }
        match active.session.poll(now) {
            Some(Verdict::Accepted(code)) => self.handle_barcode(&code).into(),
            Some(Verdict::Rejected(detail)) => DetectOutcome::Rejected { detail },
            None => DetectOutcome::Idle,
        }
    }

    /// Looks the code up and adds it to the cart.
    pub fn handle_barcode(&mut self, code: &CanonicalBarcode) -> ScanOutcome {
        match self.pricebook.lookup(code.as_str()) {
            Ok(product) => {
                self.last_scanned = None;
                let item = self.cart.add(product);
                info!("added {} ({}) qty {}", item.name, item.price, item.quantity);
                ScanOutcome::Added { item }
            }
            Err(err) => {
                warn!("{}; falling back to manual entry", err);
                self.last_scanned = Some(code.to_string());
                ScanOutcome::NotFound {
                    barcode: code.to_string(),
                }
            }
        }
    }

    /// Adds a keyed item; an entry without barcode takes the last missed scan.
    pub fn add_manual(&mut self, entry: ManualEntry) -> PosResult<CartItem> {
        let now_millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();
        let product = entry.into_product(self.last_scanned.as_deref(), now_millis)?;
        self.last_scanned = None;
        Ok(self.cart.add(&product))
    }

    /// Settles the sale and clears the cart for the next customer.
    pub fn checkout(&mut self, method: PaymentMethod) -> PosResult<Receipt> {
        let receipt = settle(self.cart.items(), self.cart.totals(), method)?;
        info!(
            "sale settled: {} items, total {}",
            receipt.totals.item_count, receipt.totals.total
        );
        self.cart.clear();
        self.last_scanned = None;
        Ok(receipt)
    }
}
