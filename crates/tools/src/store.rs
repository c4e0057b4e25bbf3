//! Appointment storage
//!
//! Storage is a collaborator behind [`AppointmentStore`]; the in-memory
//! implementation backs development and tests. Customers are keyed by
//! normalized phone number and upserted on every booking.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::error::ToolError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("appointment not found: {0}")]
    NotFound(Uuid),

    #[error("slot conflict: {0}")]
    Conflict(String),
}

impl From<StoreError> for ToolError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ToolError::NotFound(format!("appointment {}", id)),
            StoreError::Conflict(message) => ToolError::Conflict(message),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub customer_phone: String,
    pub customer_name: String,
    pub service: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff: Option<String>,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    /// Does this appointment block the given staff assignment?
    ///
    /// An unassigned appointment blocks everyone, and any appointment
    /// blocks an unassigned request.
    pub fn blocks_staff(&self, staff: Option<&str>) -> bool {
        match (&self.staff, staff) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            _ => true,
        }
    }

    pub fn overlaps(&self, start: NaiveTime, end: NaiveTime) -> bool {
        self.start < end && start < self.end
    }
}

/// A booking request before the store assigns an id
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub customer_phone: String,
    pub customer_name: String,
    pub service: String,
    pub staff: Option<String>,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub phone: String,
    pub name: String,
    pub first_seen: DateTime<Utc>,
}

/// Reduce a spoken or formatted phone number to digits
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Storage collaborator for appointments and customers
pub trait AppointmentStore: Send + Sync {
    /// Book a new appointment, upserting the customer record.
    /// Fails with [`StoreError::Conflict`] on a double booking.
    fn book(&self, new: NewAppointment) -> Result<Appointment, StoreError>;

    /// Cancel a scheduled appointment
    fn cancel(&self, id: Uuid) -> Result<Appointment, StoreError>;

    /// Move a scheduled appointment to a new slot in one step.
    ///
    /// The conflict check excludes the appointment being moved, and the
    /// original stays untouched when the new slot is rejected.
    fn reschedule(
        &self,
        id: Uuid,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<Appointment, StoreError>;

    /// Fetch one appointment
    fn get(&self, id: Uuid) -> Option<Appointment>;

    /// All scheduled appointments on a date
    fn scheduled_on(&self, date: NaiveDate) -> Vec<Appointment>;

    /// All scheduled appointments for a customer phone
    fn scheduled_for(&self, phone: &str) -> Vec<Appointment>;

    /// Look up a customer by phone
    fn customer(&self, phone: &str) -> Option<Customer>;
}

#[derive(Default)]
struct StoreInner {
    appointments: HashMap<Uuid, Appointment>,
    customers: HashMap<String, Customer>,
}

/// In-memory store for development and tests
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<StoreInner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AppointmentStore for InMemoryStore {
    fn book(&self, new: NewAppointment) -> Result<Appointment, StoreError> {
        let mut inner = self.inner.write();
        let phone = normalize_phone(&new.customer_phone);

        let clash = inner.appointments.values().find(|existing| {
            existing.status == AppointmentStatus::Scheduled
                && existing.date == new.date
                && existing.overlaps(new.start, new.end)
                && existing.blocks_staff(new.staff.as_deref())
        });
        if let Some(existing) = clash {
            return Err(StoreError::Conflict(format!(
                "{} is already booked from {} to {}",
                existing.staff.as_deref().unwrap_or("the schedule"),
                existing.start.format("%H:%M"),
                existing.end.format("%H:%M"),
            )));
        }

        inner
            .customers
            .entry(phone.clone())
            .and_modify(|c| c.name = new.customer_name.clone())
            .or_insert_with(|| Customer {
                phone: phone.clone(),
                name: new.customer_name.clone(),
                first_seen: Utc::now(),
            });

        let appointment = Appointment {
            id: Uuid::new_v4(),
            customer_phone: phone,
            customer_name: new.customer_name,
            service: new.service,
            staff: new.staff,
            date: new.date,
            start: new.start,
            end: new.end,
            status: AppointmentStatus::Scheduled,
            created_at: Utc::now(),
        };
        inner.appointments.insert(appointment.id, appointment.clone());

        tracing::info!(
            appointment_id = %appointment.id,
            date = %appointment.date,
            start = %appointment.start,
            service = %appointment.service,
            "appointment booked"
        );

        Ok(appointment)
    }

    fn cancel(&self, id: Uuid) -> Result<Appointment, StoreError> {
        let mut inner = self.inner.write();
        let appointment = inner
            .appointments
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;

        if appointment.status != AppointmentStatus::Scheduled {
            return Err(StoreError::NotFound(id));
        }
        appointment.status = AppointmentStatus::Cancelled;

        tracing::info!(appointment_id = %id, "appointment cancelled");
        Ok(appointment.clone())
    }

    fn reschedule(
        &self,
        id: Uuid,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<Appointment, StoreError> {
        let mut inner = self.inner.write();

        let original = inner
            .appointments
            .get(&id)
            .filter(|a| a.status == AppointmentStatus::Scheduled)
            .cloned()
            .ok_or(StoreError::NotFound(id))?;

        let clash = inner.appointments.values().find(|existing| {
            existing.id != id
                && existing.status == AppointmentStatus::Scheduled
                && existing.date == date
                && existing.overlaps(start, end)
                && existing.blocks_staff(original.staff.as_deref())
        });
        if let Some(existing) = clash {
            return Err(StoreError::Conflict(format!(
                "{} is already booked from {} to {}",
                existing.staff.as_deref().unwrap_or("the schedule"),
                existing.start.format("%H:%M"),
                existing.end.format("%H:%M"),
            )));
        }

        let moved = inner
            .appointments
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;
        moved.date = date;
        moved.start = start;
        moved.end = end;
        let moved = moved.clone();

        tracing::info!(
            appointment_id = %id,
            date = %date,
            start = %start,
            "appointment rescheduled"
        );
        Ok(moved)
    }

    fn get(&self, id: Uuid) -> Option<Appointment> {
        self.inner.read().appointments.get(&id).cloned()
    }

    fn scheduled_on(&self, date: NaiveDate) -> Vec<Appointment> {
        let mut result: Vec<Appointment> = self
            .inner
            .read()
            .appointments
            .values()
            .filter(|a| a.status == AppointmentStatus::Scheduled && a.date == date)
            .cloned()
            .collect();
        result.sort_by_key(|a| a.start);
        result
    }

    fn scheduled_for(&self, phone: &str) -> Vec<Appointment> {
        let phone = normalize_phone(phone);
        let mut result: Vec<Appointment> = self
            .inner
            .read()
            .appointments
            .values()
            .filter(|a| a.status == AppointmentStatus::Scheduled && a.customer_phone == phone)
            .cloned()
            .collect();
        result.sort_by_key(|a| (a.date, a.start));
        result
    }

    fn customer(&self, phone: &str) -> Option<Customer> {
        self.inner
            .read()
            .customers
            .get(&normalize_phone(phone))
            .cloned()
    }
}
