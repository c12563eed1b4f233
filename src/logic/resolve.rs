//! Find-or-create and field-copy rules shared by every upsert.

use crate::logic::error::{TrackerError, TrackerResult};
use crate::model::{
    Airline, AirlineCode, AirlineDetails, EntityKind, Flight, FlightAirline, FlightData,
    FlightNumber, FlightPassenger, FlightSchedule, Passenger, PassengerDetails, PassengerId,
    Upsert,
};
use crate::store::traits::Store;

/// Outcome of find-or-create: either nothing yet, or the stored record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved<E> {
    New,
    Existing(E),
}

/// A record that can be looked up by its identifier.
#[async_trait::async_trait]
pub trait Lookup<S: Store>: Sized + Send {
    type Key: Copy + Into<i64> + Send + Sync + 'static;
    const KIND: EntityKind;

    async fn lookup(store: &S, key: Self::Key) -> anyhow::Result<Option<Self>>;
}

#[async_trait::async_trait]
impl<S: Store> Lookup<S> for Airline {
    type Key = AirlineCode;
    const KIND: EntityKind = EntityKind::Airline;

    async fn lookup(store: &S, key: AirlineCode) -> anyhow::Result<Option<Self>> {
        store.get_airline(key).await
    }
}

#[async_trait::async_trait]
impl<S: Store> Lookup<S> for Flight {
    type Key = FlightNumber;
    const KIND: EntityKind = EntityKind::Flight;

    async fn lookup(store: &S, key: FlightNumber) -> anyhow::Result<Option<Self>> {
        store.get_flight(key).await
    }
}

#[async_trait::async_trait]
impl<S: Store> Lookup<S> for Passenger {
    type Key = PassengerId;
    const KIND: EntityKind = EntityKind::Passenger;

    async fn lookup(store: &S, key: PassengerId) -> anyhow::Result<Option<Self>> {
        store.get_passenger(key).await
    }
}

/// Look up a record that must exist.
pub async fn find_existing<E, S>(store: &S, key: E::Key) -> TrackerResult<E>
where
    E: Lookup<S>,
    S: Store,
{
    E::lookup(store, key)
        .await?
        .ok_or_else(|| TrackerError::not_found(E::KIND, key.into()))
}

/// `Create` yields a fresh slot; `Update(id)` loads the record or fails with NotFound.
pub async fn find_or_create<E, S>(store: &S, request: Upsert<E::Key>) -> TrackerResult<Resolved<E>>
where
    E: Lookup<S>,
    S: Store,
{
    match request {
        Upsert::Create => Ok(Resolved::New),
        Upsert::Update(key) => find_existing(store, key).await.map(Resolved::Existing),
    }
}

/// Overwrite every mutable field from a request payload. Fields missing from
/// the payload become `None`; this is a replace, not a patch.
pub trait CopyFields<Source> {
    fn copy_fields(&mut self, source: &Source);
}

impl CopyFields<FlightAirline> for AirlineDetails {
    fn copy_fields(&mut self, source: &FlightAirline) {
        self.name = source.airline_name.clone();
        self.phone_number = source.airline_phone_number.clone();
        self.website = source.airline_website.clone();
        self.country = source.airline_country.clone();
    }
}

impl CopyFields<FlightData> for FlightSchedule {
    fn copy_fields(&mut self, source: &FlightData) {
        self.departure_date = source.departure_date.clone();
        self.departure_time = source.departure_time.clone();
        self.arrival_date = source.arrival_date.clone();
        self.arrival_time = source.arrival_time.clone();
    }
}

impl CopyFields<FlightPassenger> for PassengerDetails {
    fn copy_fields(&mut self, source: &FlightPassenger) {
        self.first_name = source.passenger_first_name.clone();
        self.last_name = source.passenger_last_name.clone();
        self.email = source.passenger_email.clone();
        self.seat_number = source.passenger_seat_number.clone();
    }
}

/// Fields for a record that has not been stored yet.
pub fn fresh<D, Source>(source: &Source) -> D
where
    D: Default + CopyFields<Source>,
{
    let mut fields = D::default();
    fields.copy_fields(source);
    fields
}
