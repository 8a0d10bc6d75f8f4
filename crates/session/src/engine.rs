use chrono::{DateTime, Utc};

use stockbook_actor::ActorProfile;
use stockbook_catalog::Product;
use stockbook_core::{
    Aggregate, AggregateRoot, EngineError, EngineResult, IdAllocator, LotId, ProductId,
    TransactionId, UuidAllocator,
};
use stockbook_events::{Notification, NotificationLog, NotificationSink};
use stockbook_export::{
    history_rows, inventory_rows, invoice_rows, period_report_rows, to_csv_string, ExportError,
    PeriodView,
};
use stockbook_inventory::LotState;
use stockbook_ledger::PurchaseTransaction;
use stockbook_reports::{
    lifecycle_history, lifecycle_summary, period_report, DailyActivity, DateRange,
    LifecycleSummary, PeriodReport,
};

use crate::command::{
    AddProduct, EngineCommand, MoveLot, Purchase, PurchaseLine, Restock, SetProductStatus,
    UpdatePrice,
};
use crate::event::EngineEvent;
use crate::session::Session;
use crate::snapshot::Snapshot;

/// Host shell around the session aggregate.
///
/// Owns the non-deterministic edges (id allocation, notification rendering,
/// logging) so the aggregate itself stays a pure decision function. All
/// mutating operations go through [`Engine::execute`]: handle, then apply,
/// then notify.
pub struct Engine {
    session: Session,
    notifications: NotificationLog,
    ids: Box<dyn IdAllocator>,
}

impl Engine {
    pub fn new(actor: ActorProfile) -> Self {
        Self::with_allocator(Session::new(actor), Box::new(UuidAllocator))
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self::with_allocator(Session::from_snapshot(snapshot), Box::new(UuidAllocator))
    }

    /// Swap in a different id source, e.g. a sequential one for deterministic
    /// replays.
    pub fn with_allocator(session: Session, ids: Box<dyn IdAllocator>) -> Self {
        tracing::debug!(actor = %session.actor().name(), "session opened");
        Self {
            session,
            notifications: NotificationLog::new(),
            ids,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn snapshot(&self) -> Snapshot {
        self.session.snapshot()
    }

    pub fn notifications(&self) -> &[Notification] {
        self.notifications.entries()
    }

    pub fn unseen_notifications(&self) -> usize {
        self.notifications.unseen_count()
    }

    pub fn mark_notifications_seen(&mut self) {
        self.notifications.mark_all_seen();
    }

    pub fn clear_notifications(&mut self) {
        self.notifications.clear();
    }

    /// Buy `(product, quantity)` lines from the pool as one transaction.
    pub fn purchase(
        &mut self,
        items: &[(ProductId, i64)],
        at: DateTime<Utc>,
    ) -> EngineResult<TransactionId> {
        let transaction_id = TransactionId::from_uuid(self.ids.next_id());
        let lines = items
            .iter()
            .map(|&(product_id, quantity)| PurchaseLine {
                product_id,
                quantity,
                lot_id: LotId::from_uuid(self.ids.next_id()),
            })
            .collect();

        self.execute(EngineCommand::Purchase(Purchase {
            transaction_id,
            lines,
            at,
        }))?;
        tracing::info!(%transaction_id, lines = items.len(), "purchase confirmed");
        Ok(transaction_id)
    }

    /// Classify `quantity` units of a held lot as sold or personal.
    pub fn move_lot(
        &mut self,
        lot_id: LotId,
        target: LotState,
        quantity: i64,
        note: impl Into<String>,
        at: DateTime<Utc>,
    ) -> EngineResult<()> {
        let command = EngineCommand::MoveLot(MoveLot {
            lot_id,
            target,
            quantity,
            note: note.into(),
            split_candidate: LotId::from_uuid(self.ids.next_id()),
            at,
        });
        self.execute(command)?;
        tracing::info!(%lot_id, %target, quantity, "lot classified");
        Ok(())
    }

    pub fn add_product(&mut self, product: Product, at: DateTime<Utc>) -> EngineResult<()> {
        self.execute(EngineCommand::AddProduct(AddProduct { product, at }))
    }

    pub fn update_price(
        &mut self,
        product_id: ProductId,
        distributor_price: i64,
        retail_price: i64,
        at: DateTime<Utc>,
    ) -> EngineResult<()> {
        self.execute(EngineCommand::UpdatePrice(UpdatePrice {
            product_id,
            distributor_price,
            retail_price,
            at,
        }))
    }

    pub fn restock(&mut self, product_id: ProductId, additional: i64, at: DateTime<Utc>) -> EngineResult<()> {
        self.execute(EngineCommand::Restock(Restock {
            product_id,
            additional,
            at,
        }))
    }

    /// Activate or retire a product.
    pub fn set_product_active(
        &mut self,
        product_id: ProductId,
        active: bool,
        at: DateTime<Utc>,
    ) -> EngineResult<()> {
        self.execute(EngineCommand::SetProductStatus(SetProductStatus {
            product_id,
            active,
            at,
        }))
    }

    fn execute(&mut self, command: EngineCommand) -> EngineResult<()> {
        let events = match self.session.handle(&command) {
            Ok(events) => events,
            Err(err) => {
                tracing::warn!(error = %err, "command rejected");
                return Err(err);
            }
        };
        for event in &events {
            self.session.apply(event);
            self.notify(event);
        }
        Ok(())
    }

    /// Render the UI-facing text for an applied event.
    ///
    /// Runs after `apply`, so catalog lookups see post-event state.
    fn notify(&mut self, event: &EngineEvent) {
        use stockbook_events::Event;

        let text = match event {
            EngineEvent::PurchaseRecorded(fact) => format!(
                "Order confirmed: {} | Total: ₹{}",
                fact.transaction.id_typed(),
                fact.transaction.total_paid()
            ),
            EngineEvent::LowStockRaised(fact) => format!(
                "LOW STOCK ALERT: {} | only {} units left!",
                fact.product_name, fact.remaining
            ),
            EngineEvent::LotMoved(fact) => {
                let name = self.product_name(fact.product_id);
                format!(
                    "Moved {} units of {} to {}.",
                    fact.quantity,
                    name,
                    fact.target.label()
                )
            }
            EngineEvent::ProductAdded(fact) => format!(
                "New product added: {} | {} units | ₹{}",
                fact.product.name(),
                fact.product.stock(),
                fact.product.distributor_price()
            ),
            EngineEvent::PriceUpdated(fact) => format!(
                "New price updated: {} | ₹{} | ₹{}",
                fact.product_name, fact.old_distributor_price, fact.new_distributor_price
            ),
            EngineEvent::Restocked(fact) => format!(
                "Stock updated: {} | {} | {}",
                fact.product_name, fact.previous_stock, fact.new_stock
            ),
            EngineEvent::ProductStatusChanged(fact) => format!(
                "Status updated: {} | {}",
                fact.product_name,
                if fact.active { "Active" } else { "Inactive" }
            ),
        };
        self.notifications.push(text, event.occurred_at());
    }

    fn product_name(&self, product_id: ProductId) -> String {
        self.session
            .catalog()
            .try_get(product_id)
            .map(|p| p.name().to_string())
            .unwrap_or_else(|| product_id.to_string())
    }

    // Read side: aggregations and flat-file exports over current state.

    pub fn summary(&self) -> LifecycleSummary {
        lifecycle_summary(self.session.actor(), self.session.lots(), self.session.catalog())
    }

    pub fn history(&self) -> Vec<DailyActivity> {
        lifecycle_history(self.session.ledger(), self.session.lots(), self.session.catalog())
    }

    pub fn period_report(&self, range: DateRange) -> PeriodReport {
        period_report(
            self.session.ledger(),
            self.session.lots(),
            self.session.catalog(),
            range,
        )
    }

    /// Invoice CSV for one recorded transaction.
    pub fn invoice_csv(&self, transaction_id: TransactionId) -> EngineResult<String> {
        let tx = self
            .transaction(transaction_id)
            .ok_or_else(|| EngineError::validation(format!("unknown transaction {transaction_id}")))?;
        let rows = invoice_rows(tx, self.session.catalog());
        to_csv_string(&rows).map_err(export_failed)
    }

    /// Inventory CSV, restricted to one lifecycle state when given.
    pub fn inventory_csv(&self, state: Option<LotState>) -> EngineResult<String> {
        let rows = match state {
            Some(state) => inventory_rows(self.session.lots().in_state(state), self.session.catalog()),
            None => inventory_rows(self.session.lots().lots(), self.session.catalog()),
        };
        to_csv_string(&rows).map_err(export_failed)
    }

    /// One detail view of a period report as CSV.
    pub fn period_csv(&self, range: DateRange, view: PeriodView) -> EngineResult<String> {
        let report = self.period_report(range);
        to_csv_string(&period_report_rows(&report, view)).map_err(export_failed)
    }

    /// Date-bucketed lifecycle history CSV, newest date first.
    pub fn history_csv(&self) -> EngineResult<String> {
        let rows = history_rows(self.session.actor().capital_invested(), &self.history());
        to_csv_string(&rows).map_err(export_failed)
    }

    fn transaction(&self, id: TransactionId) -> Option<&PurchaseTransaction> {
        self.session
            .ledger()
            .transactions()
            .iter()
            .find(|tx| tx.id_typed() == id)
    }
}

fn export_failed(err: ExportError) -> EngineError {
    EngineError::validation(format!("export failed: {err}"))
}
