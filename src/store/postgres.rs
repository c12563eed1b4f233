use anyhow::{Context, Result};
use sqlx::{postgres::PgPoolOptions, postgres::PgRow, PgPool, Row};
use std::collections::HashMap;

use crate::model::{
    Airline, AirlineCode, AirlineDetails, Flight, FlightManifest, FlightNumber, FlightSchedule,
    Passenger, PassengerDetails, PassengerId, Upsert,
};
use crate::store::traits::{AirlineStore, AttachOutcome, FlightStore, PassengerStore, Store};

const AIRLINE_COLUMNS: &str =
    "airline_code, airline_name, airline_phone_number, airline_website, airline_country";
const FLIGHT_COLUMNS: &str =
    "flight_number, airline_code, departure_date, departure_time, arrival_date, arrival_time";
const PASSENGER_COLUMNS: &str = "passenger_id, passenger_first_name, passenger_last_name, passenger_email, passenger_seat_number";

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given database URL
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    /// Run the embedded schema migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }
}

fn airline_from_row(row: &PgRow) -> Result<Airline, sqlx::Error> {
    Ok(Airline {
        airline_code: row.try_get("airline_code")?,
        details: AirlineDetails {
            name: row.try_get("airline_name")?,
            phone_number: row.try_get("airline_phone_number")?,
            website: row.try_get("airline_website")?,
            country: row.try_get("airline_country")?,
        },
    })
}

fn flight_from_row(row: &PgRow) -> Result<Flight, sqlx::Error> {
    Ok(Flight {
        flight_number: row.try_get("flight_number")?,
        airline_code: row.try_get("airline_code")?,
        schedule: FlightSchedule {
            departure_date: row.try_get("departure_date")?,
            departure_time: row.try_get("departure_time")?,
            arrival_date: row.try_get("arrival_date")?,
            arrival_time: row.try_get("arrival_time")?,
        },
    })
}

fn passenger_from_row(row: &PgRow) -> Result<Passenger, sqlx::Error> {
    Ok(Passenger {
        passenger_id: row.try_get("passenger_id")?,
        details: PassengerDetails {
            first_name: row.try_get("passenger_first_name")?,
            last_name: row.try_get("passenger_last_name")?,
            email: row.try_get("passenger_email")?,
            seat_number: row.try_get("passenger_seat_number")?,
        },
    })
}

#[async_trait::async_trait]
impl AirlineStore for PostgresStore {
    async fn get_airline(&self, airline_code: AirlineCode) -> Result<Option<Airline>> {
        let row = sqlx::query(&format!(
            "SELECT {AIRLINE_COLUMNS} FROM airlines WHERE airline_code = $1"
        ))
        .bind(airline_code)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch airline")?;

        row.as_ref()
            .map(airline_from_row)
            .transpose()
            .context("Failed to decode airline")
    }

    async fn insert_airline(&self, details: AirlineDetails) -> Result<Airline> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO airlines (airline_name, airline_phone_number, airline_website, airline_country)
            VALUES ($1, $2, $3, $4)
            RETURNING {AIRLINE_COLUMNS}
            "#
        ))
        .bind(&details.name)
        .bind(&details.phone_number)
        .bind(&details.website)
        .bind(&details.country)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert airline")?;

        airline_from_row(&row).context("Failed to decode airline")
    }

    async fn update_airline(&self, airline: &Airline) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE airlines SET
                airline_name = $2,
                airline_phone_number = $3,
                airline_website = $4,
                airline_country = $5
            WHERE airline_code = $1
            "#,
        )
        .bind(airline.airline_code)
        .bind(&airline.details.name)
        .bind(&airline.details.phone_number)
        .bind(&airline.details.website)
        .bind(&airline.details.country)
        .execute(&self.pool)
        .await
        .context("Failed to update airline")?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_airline(&self, airline_code: AirlineCode) -> Result<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        // Lock the airline before touching its flights so a concurrent
        // insert_flight either commits first or sees the airline gone.
        let locked: Option<AirlineCode> =
            sqlx::query_scalar("SELECT airline_code FROM airlines WHERE airline_code = $1 FOR UPDATE")
                .bind(airline_code)
                .fetch_optional(&mut *tx)
                .await
                .context("Failed to lock airline")?;
        if locked.is_none() {
            return Ok(false);
        }

        // Owned flights too, so no passenger is booked onto one mid-delete.
        sqlx::query("SELECT flight_number FROM flights WHERE airline_code = $1 FOR UPDATE")
            .bind(airline_code)
            .execute(&mut *tx)
            .await
            .context("Failed to lock airline flights")?;

        // Owned flights go with the airline; their passengers do not.
        sqlx::query(
            r#"
            DELETE FROM flight_passenger
            WHERE flight_number IN (SELECT flight_number FROM flights WHERE airline_code = $1)
            "#,
        )
        .bind(airline_code)
        .execute(&mut *tx)
        .await
        .context("Failed to unlink passengers from airline flights")?;

        let flights = sqlx::query("DELETE FROM flights WHERE airline_code = $1")
            .bind(airline_code)
            .execute(&mut *tx)
            .await
            .context("Failed to delete airline flights")?;

        let result = sqlx::query("DELETE FROM airlines WHERE airline_code = $1")
            .bind(airline_code)
            .execute(&mut *tx)
            .await
            .context("Failed to delete airline")?;

        tx.commit().await.context("Failed to commit airline deletion")?;

        log::debug!(
            "Deleted airline {} and {} owned flight(s)",
            airline_code,
            flights.rows_affected()
        );
        Ok(result.rows_affected() > 0)
    }

    async fn list_flight_numbers_for_airline(
        &self,
        airline_code: AirlineCode,
    ) -> Result<Vec<FlightNumber>> {
        let numbers: Vec<FlightNumber> = sqlx::query_scalar(
            "SELECT flight_number FROM flights WHERE airline_code = $1 ORDER BY flight_number",
        )
        .bind(airline_code)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list airline flights")?;

        Ok(numbers)
    }
}

#[async_trait::async_trait]
impl FlightStore for PostgresStore {
    async fn get_flight(&self, flight_number: FlightNumber) -> Result<Option<Flight>> {
        let row = sqlx::query(&format!(
            "SELECT {FLIGHT_COLUMNS} FROM flights WHERE flight_number = $1"
        ))
        .bind(flight_number)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch flight")?;

        row.as_ref()
            .map(flight_from_row)
            .transpose()
            .context("Failed to decode flight")
    }

    async fn list_flights(&self) -> Result<Vec<FlightManifest>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;
        sqlx::query("SET TRANSACTION READ ONLY")
            .execute(&mut *tx)
            .await
            .context("Failed to mark transaction read only")?;

        let flight_rows = sqlx::query(&format!(
            "SELECT {FLIGHT_COLUMNS} FROM flights ORDER BY flight_number"
        ))
        .fetch_all(&mut *tx)
        .await
        .context("Failed to list flights")?;

        let passenger_rows = sqlx::query(&format!(
            r#"
            SELECT fp.flight_number AS booked_flight, {PASSENGER_COLUMNS}
            FROM flight_passenger fp
            JOIN passengers USING (passenger_id)
            ORDER BY passenger_id
            "#
        ))
        .fetch_all(&mut *tx)
        .await
        .context("Failed to list flight passengers")?;

        tx.commit().await.context("Failed to close read transaction")?;

        let mut passengers_by_flight: HashMap<FlightNumber, Vec<Passenger>> = HashMap::new();
        for row in &passenger_rows {
            let flight_number: FlightNumber = row
                .try_get("booked_flight")
                .context("Failed to decode flight passenger")?;
            let passenger = passenger_from_row(row).context("Failed to decode passenger")?;
            passengers_by_flight
                .entry(flight_number)
                .or_default()
                .push(passenger);
        }

        flight_rows
            .iter()
            .map(|row| -> Result<FlightManifest> {
                let flight = flight_from_row(row).context("Failed to decode flight")?;
                let passengers = passengers_by_flight
                    .remove(&flight.flight_number)
                    .unwrap_or_default();
                Ok(FlightManifest { flight, passengers })
            })
            .collect()
    }

    async fn list_passengers_for_flight(
        &self,
        flight_number: FlightNumber,
    ) -> Result<Vec<Passenger>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {PASSENGER_COLUMNS}
            FROM passengers
            JOIN flight_passenger USING (passenger_id)
            WHERE flight_passenger.flight_number = $1
            ORDER BY passenger_id
            "#
        ))
        .bind(flight_number)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list flight passengers")?;

        rows.iter()
            .map(|row| passenger_from_row(row).context("Failed to decode passenger"))
            .collect()
    }

    async fn insert_flight(
        &self,
        airline_code: AirlineCode,
        schedule: FlightSchedule,
    ) -> Result<Option<Flight>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let owner: Option<AirlineCode> =
            sqlx::query_scalar("SELECT airline_code FROM airlines WHERE airline_code = $1 FOR SHARE")
                .bind(airline_code)
                .fetch_optional(&mut *tx)
                .await
                .context("Failed to lock airline")?;
        if owner.is_none() {
            return Ok(None);
        }

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO flights (airline_code, departure_date, departure_time, arrival_date, arrival_time)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {FLIGHT_COLUMNS}
            "#
        ))
        .bind(airline_code)
        .bind(&schedule.departure_date)
        .bind(&schedule.departure_time)
        .bind(&schedule.arrival_date)
        .bind(&schedule.arrival_time)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to insert flight")?;

        let flight = flight_from_row(&row).context("Failed to decode flight")?;
        tx.commit().await.context("Failed to commit flight")?;

        Ok(Some(flight))
    }

    async fn update_flight(&self, flight: &Flight) -> Result<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let owner: Option<AirlineCode> =
            sqlx::query_scalar("SELECT airline_code FROM airlines WHERE airline_code = $1 FOR SHARE")
                .bind(flight.airline_code)
                .fetch_optional(&mut *tx)
                .await
                .context("Failed to lock airline")?;
        if owner.is_none() {
            return Ok(false);
        }

        let result = sqlx::query(
            r#"
            UPDATE flights SET
                airline_code = $2,
                departure_date = $3,
                departure_time = $4,
                arrival_date = $5,
                arrival_time = $6
            WHERE flight_number = $1
            "#,
        )
        .bind(flight.flight_number)
        .bind(flight.airline_code)
        .bind(&flight.schedule.departure_date)
        .bind(&flight.schedule.departure_time)
        .bind(&flight.schedule.arrival_date)
        .bind(&flight.schedule.arrival_time)
        .execute(&mut *tx)
        .await
        .context("Failed to update flight")?;

        tx.commit().await.context("Failed to commit flight")?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_flight(&self, flight_number: FlightNumber) -> Result<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let locked: Option<FlightNumber> =
            sqlx::query_scalar("SELECT flight_number FROM flights WHERE flight_number = $1 FOR UPDATE")
                .bind(flight_number)
                .fetch_optional(&mut *tx)
                .await
                .context("Failed to lock flight")?;
        if locked.is_none() {
            return Ok(false);
        }

        sqlx::query("DELETE FROM flight_passenger WHERE flight_number = $1")
            .bind(flight_number)
            .execute(&mut *tx)
            .await
            .context("Failed to unlink flight passengers")?;

        let result = sqlx::query("DELETE FROM flights WHERE flight_number = $1")
            .bind(flight_number)
            .execute(&mut *tx)
            .await
            .context("Failed to delete flight")?;

        tx.commit().await.context("Failed to commit flight deletion")?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl PassengerStore for PostgresStore {
    async fn get_passenger(&self, passenger_id: PassengerId) -> Result<Option<Passenger>> {
        let row = sqlx::query(&format!(
            "SELECT {PASSENGER_COLUMNS} FROM passengers WHERE passenger_id = $1"
        ))
        .bind(passenger_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch passenger")?;

        row.as_ref()
            .map(passenger_from_row)
            .transpose()
            .context("Failed to decode passenger")
    }

    async fn list_flight_numbers_for_passenger(
        &self,
        passenger_id: PassengerId,
    ) -> Result<Vec<FlightNumber>> {
        let numbers: Vec<FlightNumber> = sqlx::query_scalar(
            "SELECT flight_number FROM flight_passenger WHERE passenger_id = $1 ORDER BY flight_number",
        )
        .bind(passenger_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list passenger flights")?;

        Ok(numbers)
    }

    async fn attach_passenger(
        &self,
        target: Upsert<PassengerId>,
        details: PassengerDetails,
        flight_number: FlightNumber,
    ) -> Result<AttachOutcome> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let flight: Option<FlightNumber> =
            sqlx::query_scalar("SELECT flight_number FROM flights WHERE flight_number = $1 FOR SHARE")
                .bind(flight_number)
                .fetch_optional(&mut *tx)
                .await
                .context("Failed to lock flight")?;
        if flight.is_none() {
            return Ok(AttachOutcome::FlightMissing);
        }

        let row = match target {
            Upsert::Create => sqlx::query(&format!(
                r#"
                INSERT INTO passengers (passenger_first_name, passenger_last_name, passenger_email, passenger_seat_number)
                VALUES ($1, $2, $3, $4)
                RETURNING {PASSENGER_COLUMNS}
                "#
            ))
            .bind(&details.first_name)
            .bind(&details.last_name)
            .bind(&details.email)
            .bind(&details.seat_number)
            .fetch_optional(&mut *tx)
            .await
            .context("Failed to insert passenger")?,
            Upsert::Update(passenger_id) => sqlx::query(&format!(
                r#"
                UPDATE passengers SET
                    passenger_first_name = $2,
                    passenger_last_name = $3,
                    passenger_email = $4,
                    passenger_seat_number = $5
                WHERE passenger_id = $1
                RETURNING {PASSENGER_COLUMNS}
                "#
            ))
            .bind(passenger_id)
            .bind(&details.first_name)
            .bind(&details.last_name)
            .bind(&details.email)
            .bind(&details.seat_number)
            .fetch_optional(&mut *tx)
            .await
            .context("Failed to update passenger")?,
        };
        let Some(row) = row else {
            return Ok(AttachOutcome::PassengerMissing);
        };
        let passenger = passenger_from_row(&row).context("Failed to decode passenger")?;

        // The junction row is both sides of the link.
        sqlx::query(
            r#"
            INSERT INTO flight_passenger (flight_number, passenger_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(flight_number)
        .bind(passenger.passenger_id)
        .execute(&mut *tx)
        .await
        .context("Failed to link passenger to flight")?;

        tx.commit().await.context("Failed to commit passenger")?;

        Ok(AttachOutcome::Attached(passenger))
    }

    async fn delete_passenger(&self, passenger_id: PassengerId) -> Result<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let locked: Option<PassengerId> =
            sqlx::query_scalar("SELECT passenger_id FROM passengers WHERE passenger_id = $1 FOR UPDATE")
                .bind(passenger_id)
                .fetch_optional(&mut *tx)
                .await
                .context("Failed to lock passenger")?;
        if locked.is_none() {
            return Ok(false);
        }

        sqlx::query("DELETE FROM flight_passenger WHERE passenger_id = $1")
            .bind(passenger_id)
            .execute(&mut *tx)
            .await
            .context("Failed to unlink passenger flights")?;

        let result = sqlx::query("DELETE FROM passengers WHERE passenger_id = $1")
            .bind(passenger_id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete passenger")?;

        tx.commit().await.context("Failed to commit passenger deletion")?;

        Ok(result.rows_affected() > 0)
    }
}

impl Store for PostgresStore {}
