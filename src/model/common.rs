/// Identifier of an airline, assigned by the store on first save.
pub type AirlineCode = i64;
/// Identifier of a flight, assigned by the store on first save.
pub type FlightNumber = i64;
/// Identifier of a passenger, assigned by the store on first save.
pub type PassengerId = i64;

/// Whether a mutating call creates a fresh record or replaces an existing one.
///
/// A caller-supplied identifier always means `Update`; new identifiers are
/// only ever handed out by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Upsert<K> {
    Create,
    Update(K),
}

impl<K> Upsert<K> {
    /// Maps an optional identifier from a request body onto an upsert.
    pub fn from_optional(id: Option<K>) -> Self {
        match id {
            Some(id) => Upsert::Update(id),
            None => Upsert::Create,
        }
    }

    pub fn key(&self) -> Option<&K> {
        match self {
            Upsert::Create => None,
            Upsert::Update(id) => Some(id),
        }
    }
}

/// The three kinds of record the tracker stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Airline,
    Flight,
    Passenger,
}

impl EntityKind {
    pub fn name(self) -> &'static str {
        match self {
            EntityKind::Airline => "Airline",
            EntityKind::Flight => "Flight",
            EntityKind::Passenger => "Passenger",
        }
    }

    /// Name of the identifier field as it appears on the wire.
    pub fn key_name(self) -> &'static str {
        match self {
            EntityKind::Airline => "airlineCode",
            EntityKind::Flight => "flightNumber",
            EntityKind::Passenger => "passengerId",
        }
    }
}
