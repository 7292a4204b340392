//! The store actor: sole owner of the [`AppState`], persisted after every
//! change.

use std::{any::Any, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use model::{
    field::{Field, FieldPatch},
    marked_line::{LineKind, MarkedLine, MarkedLinePatch},
    measurement::{Measurement, MeasurementPatch},
    WithId,
};
use utility::id::Id;

use crate::{
    actor::{self, Actor, ActorError, ActorRef, Handler, Message, SupervisionStrategy},
    error::{Result, StoreError},
    exchange::{self, ExportDocument},
    state::AppState,
    storage::Storage,
};

pub struct StoreActor {
    storage: Arc<dyn Storage>,
    key: String,
    state: Option<AppState>,
}

pub type StoreHandle = ActorRef<StoreActor>;

impl StoreActor {
    pub fn new(storage: Arc<dyn Storage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            state: None,
        }
    }

    /// Spawns the actor. Nothing is loaded until the first message.
    pub fn spawn(storage: Arc<dyn Storage>, key: impl Into<String>) -> StoreHandle {
        actor::run(Self::new(storage, key))
    }

    /// `None` when there is nothing usable under the key.
    async fn read_stored(&self) -> Result<Option<AppState>> {
        let Some(content) = self.storage.load(&self.key).await? else {
            log::info!("nothing stored under `{}`", self.key);
            return Ok(None);
        };
        match serde_json::from_str(&content) {
            Ok(state) => Ok(Some(state)),
            Err(why) => {
                log::warn!("stored state under `{}` is unreadable: {}", self.key, why);
                Ok(None)
            }
        }
    }

    async fn persist(&self, state: &AppState) -> Result<()> {
        let content = serde_json::to_string(state)?;
        self.storage.save(&self.key, &content).await
    }

    /// Loads on first use. Every empty collection is refilled with its
    /// defaults, and the result saved when anything was filled in.
    async fn state(&mut self) -> Result<&AppState> {
        if self.state.is_none() {
            let mut state = self.read_stored().await?.unwrap_or_default();
            if state.seed_defaults(Utc::now()) {
                self.persist(&state).await?;
            }
            self.state = Some(state);
        }
        self.state.as_ref().ok_or(StoreError::Unavailable)
    }

    /// Runs `change` on a copy, persists it, then makes it current. Any
    /// failure leaves the current state as it was.
    async fn mutate<T>(&mut self, change: impl FnOnce(&mut AppState) -> Result<T>) -> Result<T> {
        let mut next = self.state().await?.clone();
        let value = change(&mut next)?;
        self.persist(&next).await?;
        self.state = Some(next);
        Ok(value)
    }
}

#[async_trait]
impl Actor for StoreActor {
    async fn on_fail(&mut self, _: Box<dyn Any + Send>) -> SupervisionStrategy {
        self.state = None;
        match self.state().await {
            Ok(_) => {
                log::warn!("store reloaded from storage after a failed message");
                SupervisionStrategy::Resume
            }
            Err(why) => {
                log::error!("store could not reload, stopping: {}", why);
                SupervisionStrategy::Stop
            }
        }
    }
}

macro_rules! store_message {
    ($message:ty => $response:ty) => {
        impl Message for $message {
            type Response = Result<$response>;
        }
    };
}

#[derive(Debug)]
pub struct GetState;
store_message!(GetState => AppState);

#[async_trait]
impl Handler<GetState> for StoreActor {
    async fn handle(&mut self, _: GetState) -> Result<AppState> {
        self.state().await.cloned()
    }
}

/// Drops the cached state and reads it from storage again.
#[derive(Debug)]
pub struct Reload;
store_message!(Reload => AppState);

#[async_trait]
impl Handler<Reload> for StoreActor {
    async fn handle(&mut self, _: Reload) -> Result<AppState> {
        self.state = None;
        self.state().await.cloned()
    }
}

// fields

#[derive(Debug)]
pub struct AddField(pub Field);
store_message!(AddField => Id<Field>);

#[async_trait]
impl Handler<AddField> for StoreActor {
    async fn handle(&mut self, AddField(field): AddField) -> Result<Id<Field>> {
        self.mutate(|state| Ok(state.add_field(field))).await
    }
}

#[derive(Debug)]
pub struct UpdateField {
    pub id: Id<Field>,
    pub patch: FieldPatch,
    pub at: DateTime<Utc>,
}
store_message!(UpdateField => ());

#[async_trait]
impl Handler<UpdateField> for StoreActor {
    async fn handle(&mut self, message: UpdateField) -> Result<()> {
        let UpdateField { id, patch, at } = message;
        self.mutate(|state| state.update_field(&id, patch, at)).await
    }
}

#[derive(Debug)]
pub struct RemoveField(pub Id<Field>);
store_message!(RemoveField => WithId<Field>);

#[async_trait]
impl Handler<RemoveField> for StoreActor {
    async fn handle(&mut self, RemoveField(id): RemoveField) -> Result<WithId<Field>> {
        self.mutate(|state| state.remove_field(&id)).await
    }
}

#[derive(Debug)]
pub struct ClearFields;
store_message!(ClearFields => ());

#[async_trait]
impl Handler<ClearFields> for StoreActor {
    async fn handle(&mut self, _: ClearFields) -> Result<()> {
        self.mutate(|state| {
            state.clear_fields();
            Ok(())
        })
        .await
    }
}

#[derive(Debug)]
pub struct SetActiveField(pub Option<Id<Field>>);
store_message!(SetActiveField => ());

#[async_trait]
impl Handler<SetActiveField> for StoreActor {
    async fn handle(&mut self, SetActiveField(id): SetActiveField) -> Result<()> {
        self.mutate(|state| state.set_active_field(id)).await
    }
}

// lines

#[derive(Debug)]
pub struct AddLine(pub MarkedLine);
store_message!(AddLine => Id<MarkedLine>);

#[async_trait]
impl Handler<AddLine> for StoreActor {
    async fn handle(&mut self, AddLine(line): AddLine) -> Result<Id<MarkedLine>> {
        self.mutate(|state| Ok(state.add_line(line))).await
    }
}

#[derive(Debug)]
pub struct UpdateLine {
    pub id: Id<MarkedLine>,
    pub patch: MarkedLinePatch,
}
store_message!(UpdateLine => ());

#[async_trait]
impl Handler<UpdateLine> for StoreActor {
    async fn handle(&mut self, UpdateLine { id, patch }: UpdateLine) -> Result<()> {
        self.mutate(|state| state.update_line(id, patch)).await
    }
}

#[derive(Debug)]
pub struct CompleteLine(pub Id<MarkedLine>);
store_message!(CompleteLine => ());

#[async_trait]
impl Handler<CompleteLine> for StoreActor {
    async fn handle(&mut self, CompleteLine(id): CompleteLine) -> Result<()> {
        self.mutate(|state| state.complete_line(id)).await
    }
}

#[derive(Debug)]
pub struct RemoveLine(pub Id<MarkedLine>);
store_message!(RemoveLine => WithId<MarkedLine>);

#[async_trait]
impl Handler<RemoveLine> for StoreActor {
    async fn handle(&mut self, RemoveLine(id): RemoveLine) -> Result<WithId<MarkedLine>> {
        self.mutate(|state| state.remove_line(id)).await
    }
}

#[derive(Debug)]
pub struct ResetMarking;
store_message!(ResetMarking => ());

#[async_trait]
impl Handler<ResetMarking> for StoreActor {
    async fn handle(&mut self, _: ResetMarking) -> Result<()> {
        self.mutate(|state| {
            state.reset_marking();
            Ok(())
        })
        .await
    }
}

// measurements

#[derive(Debug)]
pub struct AddMeasurement(pub Measurement);
store_message!(AddMeasurement => Id<Measurement>);

#[async_trait]
impl Handler<AddMeasurement> for StoreActor {
    async fn handle(&mut self, AddMeasurement(measurement): AddMeasurement) -> Result<Id<Measurement>> {
        self.mutate(|state| Ok(state.add_measurement(measurement))).await
    }
}

#[derive(Debug)]
pub struct UpdateMeasurement {
    pub id: Id<Measurement>,
    pub patch: MeasurementPatch,
}
store_message!(UpdateMeasurement => ());

#[async_trait]
impl Handler<UpdateMeasurement> for StoreActor {
    async fn handle(&mut self, UpdateMeasurement { id, patch }: UpdateMeasurement) -> Result<()> {
        self.mutate(|state| state.update_measurement(&id, patch)).await
    }
}

#[derive(Debug)]
pub struct RemoveMeasurement(pub Id<Measurement>);
store_message!(RemoveMeasurement => WithId<Measurement>);

#[async_trait]
impl Handler<RemoveMeasurement> for StoreActor {
    async fn handle(&mut self, RemoveMeasurement(id): RemoveMeasurement) -> Result<WithId<Measurement>> {
        self.mutate(|state| state.remove_measurement(&id)).await
    }
}

// session results

/// A finished measurement for `field`, or the active field when `None`.
#[derive(Debug)]
pub struct RecordMeasurement {
    pub field: Option<Id<Field>>,
    pub measurement: Measurement,
    pub at: DateTime<Utc>,
}
store_message!(RecordMeasurement => Id<Measurement>);

#[async_trait]
impl Handler<RecordMeasurement> for StoreActor {
    async fn handle(&mut self, message: RecordMeasurement) -> Result<Id<Measurement>> {
        let RecordMeasurement {
            field,
            measurement,
            at,
        } = message;
        self.mutate(|state| state.record_measurement(field.as_ref(), measurement, at))
            .await
    }
}

/// Files a walked line as the next numbered line in one step.
#[derive(Debug)]
pub struct RecordMarking {
    pub field: Option<Id<Field>>,
    pub kind: LineKind,
    pub length_meters: f64,
    pub at: DateTime<Utc>,
}
store_message!(RecordMarking => WithId<MarkedLine>);

#[async_trait]
impl Handler<RecordMarking> for StoreActor {
    async fn handle(&mut self, message: RecordMarking) -> Result<WithId<MarkedLine>> {
        let RecordMarking {
            field,
            kind,
            length_meters,
            at,
        } = message;
        self.mutate(|state| state.record_marking(field.as_ref(), kind, length_meters, at))
            .await
    }
}

// exchange

#[derive(Debug)]
pub struct Export {
    pub at: DateTime<Utc>,
}
store_message!(Export => ExportDocument);

#[async_trait]
impl Handler<Export> for StoreActor {
    async fn handle(&mut self, Export { at }: Export) -> Result<ExportDocument> {
        let state = self.state().await?;
        Ok(ExportDocument::new(state, at))
    }
}

/// Raw JSON of an import document.
#[derive(Debug)]
pub struct Import(pub String);
store_message!(Import => AppState);

#[async_trait]
impl Handler<Import> for StoreActor {
    async fn handle(&mut self, Import(document): Import) -> Result<AppState> {
        self.mutate(|state| {
            *state = exchange::import(state, &document)?;
            Ok(state.clone())
        })
        .await
    }
}

impl From<ActorError> for StoreError {
    fn from(why: ActorError) -> Self {
        log::error!("store actor unreachable: {}", why);
        StoreError::Unavailable
    }
}

/// Typed calls on the store.
#[async_trait]
pub trait StoreRef {
    async fn snapshot(&self) -> Result<AppState>;
    async fn reload(&self) -> Result<AppState>;

    async fn add_field(&self, field: Field) -> Result<Id<Field>>;
    async fn update_field(&self, id: Id<Field>, patch: FieldPatch) -> Result<()>;
    async fn remove_field(&self, id: Id<Field>) -> Result<WithId<Field>>;
    async fn clear_fields(&self) -> Result<()>;
    async fn set_active_field(&self, id: Option<Id<Field>>) -> Result<()>;

    async fn add_line(&self, line: MarkedLine) -> Result<Id<MarkedLine>>;
    async fn update_line(&self, id: Id<MarkedLine>, patch: MarkedLinePatch) -> Result<()>;
    async fn complete_line(&self, id: Id<MarkedLine>) -> Result<()>;
    async fn remove_line(&self, id: Id<MarkedLine>) -> Result<WithId<MarkedLine>>;
    async fn reset_marking(&self) -> Result<()>;

    async fn add_measurement(&self, measurement: Measurement) -> Result<Id<Measurement>>;
    async fn update_measurement(&self, id: Id<Measurement>, patch: MeasurementPatch) -> Result<()>;
    async fn remove_measurement(&self, id: Id<Measurement>) -> Result<WithId<Measurement>>;

    async fn record_measurement(
        &self,
        field: Option<Id<Field>>,
        measurement: Measurement,
    ) -> Result<Id<Measurement>>;
    async fn record_marking(
        &self,
        field: Option<Id<Field>>,
        kind: LineKind,
        length_meters: f64,
    ) -> Result<WithId<MarkedLine>>;

    async fn export(&self) -> Result<ExportDocument>;
    async fn import(&self, document: String) -> Result<AppState>;
}

#[async_trait]
impl StoreRef for StoreHandle {
    async fn snapshot(&self) -> Result<AppState> {
        self.ask(GetState).await?
    }

    async fn reload(&self) -> Result<AppState> {
        self.ask(Reload).await?
    }

    async fn add_field(&self, field: Field) -> Result<Id<Field>> {
        self.ask(AddField(field)).await?
    }

    async fn update_field(&self, id: Id<Field>, patch: FieldPatch) -> Result<()> {
        self.ask(UpdateField {
            id,
            patch,
            at: Utc::now(),
        })
        .await?
    }

    async fn remove_field(&self, id: Id<Field>) -> Result<WithId<Field>> {
        self.ask(RemoveField(id)).await?
    }

    async fn clear_fields(&self) -> Result<()> {
        self.ask(ClearFields).await?
    }

    async fn set_active_field(&self, id: Option<Id<Field>>) -> Result<()> {
        self.ask(SetActiveField(id)).await?
    }

    async fn add_line(&self, line: MarkedLine) -> Result<Id<MarkedLine>> {
        self.ask(AddLine(line)).await?
    }

    async fn update_line(&self, id: Id<MarkedLine>, patch: MarkedLinePatch) -> Result<()> {
        self.ask(UpdateLine { id, patch }).await?
    }

    async fn complete_line(&self, id: Id<MarkedLine>) -> Result<()> {
        self.ask(CompleteLine(id)).await?
    }

    async fn remove_line(&self, id: Id<MarkedLine>) -> Result<WithId<MarkedLine>> {
        self.ask(RemoveLine(id)).await?
    }

    async fn reset_marking(&self) -> Result<()> {
        self.ask(ResetMarking).await?
    }

    async fn add_measurement(&self, measurement: Measurement) -> Result<Id<Measurement>> {
        self.ask(AddMeasurement(measurement)).await?
    }

    async fn update_measurement(&self, id: Id<Measurement>, patch: MeasurementPatch) -> Result<()> {
        self.ask(UpdateMeasurement { id, patch }).await?
    }

    async fn remove_measurement(&self, id: Id<Measurement>) -> Result<WithId<Measurement>> {
        self.ask(RemoveMeasurement(id)).await?
    }

    async fn record_measurement(
        &self,
        field: Option<Id<Field>>,
        measurement: Measurement,
    ) -> Result<Id<Measurement>> {
        self.ask(RecordMeasurement {
            field,
            measurement,
            at: Utc::now(),
        })
        .await?
    }

    async fn record_marking(
        &self,
        field: Option<Id<Field>>,
        kind: LineKind,
        length_meters: f64,
    ) -> Result<WithId<MarkedLine>> {
        self.ask(RecordMarking {
            field,
            kind,
            length_meters,
            at: Utc::now(),
        })
        .await?
    }

    async fn export(&self) -> Result<ExportDocument> {
        self.ask(Export { at: Utc::now() }).await?
    }

    async fn import(&self, document: String) -> Result<AppState> {
        self.ask(Import(document)).await?
    }
}
