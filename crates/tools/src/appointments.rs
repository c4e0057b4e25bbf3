//! Appointment tools
//!
//! The seven operations the decision model can invoke. Domain-level
//! outcomes the caller can act on (slot taken, several matches) come back
//! as structured success payloads so the model can relay them; only
//! contract violations and store failures surface as tool errors.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveTime};
use serde_json::{json, Value};

use frontdesk_config::BusinessProfile;

use crate::availability::{available_slots, slot_is_free, SlotQuery};
use crate::datetime::{parse_spoken_date, parse_spoken_time, Clock};
use crate::error::ToolError;
use crate::schema::{InputSchema, PropertySchema, Tool};
use crate::store::{Appointment, AppointmentStore, NewAppointment};

/// Shared dependencies for the appointment tools
pub struct ToolContext {
    pub store: Arc<dyn AppointmentStore>,
    pub profile: Arc<BusinessProfile>,
    pub clock: Arc<dyn Clock>,
}

impl ToolContext {
    pub fn new(
        store: Arc<dyn AppointmentStore>,
        profile: Arc<BusinessProfile>,
        clock: Arc<dyn Clock>,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            profile,
            clock,
        })
    }

    fn parse_date(&self, text: &str) -> Result<NaiveDate, ToolError> {
        parse_spoken_date(text, self.clock.today())
            .ok_or_else(|| ToolError::invalid(format!("could not understand date '{}'", text)))
    }

    fn parse_time(&self, text: &str) -> Result<NaiveTime, ToolError> {
        parse_spoken_time(text)
            .ok_or_else(|| ToolError::invalid(format!("could not understand time '{}'", text)))
    }

    fn reject_past(&self, date: NaiveDate, time: Option<NaiveTime>) -> Result<(), ToolError> {
        let now = self.clock.now();
        if date < now.date() {
            return Err(ToolError::invalid(format!("{} is in the past", date)));
        }
        if let Some(time) = time {
            if date == now.date() && time <= now.time() {
                return Err(ToolError::invalid(format!(
                    "{} today is in the past",
                    time.format("%H:%M")
                )));
            }
        }
        Ok(())
    }

    fn service_duration(&self, name: &str) -> Result<(String, u32), ToolError> {
        match self.profile.find_service(name) {
            Some(service) => Ok((service.name.clone(), service.duration_minutes)),
            None => {
                let known: Vec<&str> = self
                    .profile
                    .services
                    .iter()
                    .map(|s| s.name.as_str())
                    .collect();
                Err(ToolError::invalid(format!(
                    "unknown service '{}'; we offer: {}",
                    name,
                    known.join(", ")
                )))
            },
        }
    }

    fn resolve_staff(&self, name: &str, service: &str) -> Result<String, ToolError> {
        let Some(staff) = self.profile.find_staff(name) else {
            let known: Vec<&str> = self.profile.staff.iter().map(|s| s.name.as_str()).collect();
            return Err(ToolError::invalid(format!(
                "unknown staff member '{}'; our team: {}",
                name,
                known.join(", ")
            )));
        };
        if !staff.handles(service) {
            return Err(ToolError::invalid(format!(
                "{} does not handle {}",
                staff.name, service
            )));
        }
        Ok(staff.name.clone())
    }
}

fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str, ToolError> {
    args.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ToolError::invalid(format!("missing required argument '{}'", key)))
}

fn optional_str<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn add_minutes(start: NaiveTime, minutes: u32) -> NaiveTime {
    start
        .overflowing_add_signed(Duration::minutes(minutes as i64))
        .0
}

fn format_slots(slots: &[NaiveTime]) -> Vec<String> {
    slots.iter().map(|s| s.format("%H:%M").to_string()).collect()
}

fn appointment_json(appointment: &Appointment) -> Value {
    json!({
        "appointment_id": appointment.id,
        "service": appointment.service,
        "staff": appointment.staff,
        "date": appointment.date.format("%Y-%m-%d").to_string(),
        "day": appointment.date.format("%A").to_string(),
        "start": appointment.start.format("%H:%M").to_string(),
        "end": appointment.end.format("%H:%M").to_string(),
        "customer_name": appointment.customer_name,
    })
}

/// Find one scheduled appointment for a phone, narrowed by optional
/// date/time; `Err` payloads here are success-values the model relays.
fn find_single_appointment(
    context: &ToolContext,
    phone: &str,
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
) -> Result<Appointment, Result<Value, ToolError>> {
    let mut matches = context.store.scheduled_for(phone);
    if matches.is_empty() {
        return Err(Err(ToolError::NotFound(
            "no scheduled appointments for that phone number".to_string(),
        )));
    }
    if let Some(date) = date {
        matches.retain(|a| a.date == date);
    }
    if let Some(time) = time {
        matches.retain(|a| a.start == time);
    }

    match matches.len() {
        0 => Err(Err(ToolError::NotFound(
            "no appointment matches that date and time".to_string(),
        ))),
        1 => Ok(matches.remove(0)),
        _ => Err(Ok(json!({
            "success": false,
            "reason": "multiple_matches",
            "message": "More than one appointment matches; ask which one they mean.",
            "appointments": matches.iter().map(appointment_json).collect::<Vec<_>>(),
        }))),
    }
}

// ---------------------------------------------------------------------------
// get_services
// ---------------------------------------------------------------------------

pub struct GetServicesTool {
    context: Arc<ToolContext>,
}

impl GetServicesTool {
    pub fn new(context: Arc<ToolContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Tool for GetServicesTool {
    fn name(&self) -> &str {
        "get_services"
    }

    fn description(&self) -> &str {
        "List the services we offer with durations and prices"
    }

    fn schema(&self) -> InputSchema {
        InputSchema::object()
    }

    async fn execute(&self, _arguments: Value) -> Result<Value, ToolError> {
        let services: Vec<Value> = self
            .context
            .profile
            .services
            .iter()
            .map(|s| {
                json!({
                    "name": s.name,
                    "duration_minutes": s.duration_minutes,
                    "price": s.price,
                    "description": s.description,
                })
            })
            .collect();
        Ok(json!({ "services": services }))
    }
}

// ---------------------------------------------------------------------------
// get_staff
// ---------------------------------------------------------------------------

pub struct GetStaffTool {
    context: Arc<ToolContext>,
}

impl GetStaffTool {
    pub fn new(context: Arc<ToolContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Tool for GetStaffTool {
    fn name(&self) -> &str {
        "get_staff"
    }

    fn description(&self) -> &str {
        "List staff members, optionally only those who handle a service"
    }

    fn schema(&self) -> InputSchema {
        InputSchema::object().property(
            "service",
            PropertySchema::string("Only staff who handle this service"),
            false,
        )
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let service = match optional_str(&arguments, "service") {
            Some(name) => Some(self.context.service_duration(name)?.0),
            None => None,
        };

        let staff: Vec<Value> = self
            .context
            .profile
            .staff
            .iter()
            .filter(|s| service.as_deref().map_or(true, |svc| s.handles(svc)))
            .map(|s| {
                let services = (!s.services.is_empty()).then_some(&s.services);
                json!({
                    "name": s.name,
                    "role": s.role,
                    "services": services,
                })
            })
            .collect();
        Ok(json!({ "staff": staff }))
    }
}

// ---------------------------------------------------------------------------
// check_availability
// ---------------------------------------------------------------------------

pub struct CheckAvailabilityTool {
    context: Arc<ToolContext>,
}

impl CheckAvailabilityTool {
    pub fn new(context: Arc<ToolContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Tool for CheckAvailabilityTool {
    fn name(&self) -> &str {
        "check_availability"
    }

    fn description(&self) -> &str {
        "Find open appointment slots for a service on a date"
    }

    fn schema(&self) -> InputSchema {
        InputSchema::object()
            .property("service", PropertySchema::string("Service name"), true)
            .property(
                "date",
                PropertySchema::string("Date, e.g. 2026-09-12, 'tomorrow', 'friday'"),
                true,
            )
            .property(
                "time",
                PropertySchema::string("Preferred time, e.g. '10:30', '2pm', 'morning'"),
                false,
            )
            .property("staff", PropertySchema::string("Preferred staff member"), false)
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let context = &self.context;
        let (service, duration) = context.service_duration(required_str(&arguments, "service")?)?;
        let date = context.parse_date(required_str(&arguments, "date")?)?;
        context.reject_past(date, None)?;

        let requested_time = match optional_str(&arguments, "time") {
            Some(text) => Some(context.parse_time(text)?),
            None => None,
        };
        let staff = match optional_str(&arguments, "staff") {
            Some(name) => Some(context.resolve_staff(name, &service)?),
            None => None,
        };

        let booked = context.store.scheduled_on(date);
        let availability = available_slots(
            &context.profile,
            &booked,
            &SlotQuery {
                date,
                duration_minutes: duration,
                staff,
                requested_time,
            },
        );

        if availability.is_closed {
            return Ok(json!({
                "is_closed": true,
                "date": date.format("%Y-%m-%d").to_string(),
                "day": date.format("%A").to_string(),
                "message": format!("We are closed on {}s.", date.format("%A")),
                "slots": [],
            }));
        }

        Ok(json!({
            "is_closed": false,
            "date": date.format("%Y-%m-%d").to_string(),
            "day": date.format("%A").to_string(),
            "service": service,
            "duration_minutes": duration,
            "slots": format_slots(&availability.slots),
        }))
    }
}

// ---------------------------------------------------------------------------
// book_appointment
// ---------------------------------------------------------------------------

pub struct BookAppointmentTool {
    context: Arc<ToolContext>,
}

impl BookAppointmentTool {
    pub fn new(context: Arc<ToolContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Tool for BookAppointmentTool {
    fn name(&self) -> &str {
        "book_appointment"
    }

    fn description(&self) -> &str {
        "Book an appointment once the caller has confirmed a slot"
    }

    fn schema(&self) -> InputSchema {
        InputSchema::object()
            .property("customer_name", PropertySchema::string("Caller's name"), true)
            .property(
                "customer_phone",
                PropertySchema::string("Caller's phone number"),
                true,
            )
            .property("service", PropertySchema::string("Service name"), true)
            .property("date", PropertySchema::string("Appointment date"), true)
            .property("time", PropertySchema::string("Appointment start time"), true)
            .property("staff", PropertySchema::string("Requested staff member"), false)
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let context = &self.context;
        let customer_name = required_str(&arguments, "customer_name")?.to_string();
        let customer_phone = required_str(&arguments, "customer_phone")?.to_string();
        let (service, duration) = context.service_duration(required_str(&arguments, "service")?)?;
        let date = context.parse_date(required_str(&arguments, "date")?)?;
        let start = context.parse_time(required_str(&arguments, "time")?)?;
        context.reject_past(date, Some(start))?;

        let staff = match optional_str(&arguments, "staff") {
            Some(name) => Some(context.resolve_staff(name, &service)?),
            None => None,
        };

        // Re-validate the slot right before writing; the caller may have
        // been talking for a while since the availability check
        let booked = context.store.scheduled_on(date);
        if !slot_is_free(&context.profile, &booked, date, start, duration, staff.as_deref()) {
            let alternatives = available_slots(
                &context.profile,
                &booked,
                &SlotQuery {
                    date,
                    duration_minutes: duration,
                    staff: staff.clone(),
                    requested_time: Some(start),
                },
            );
            return Ok(json!({
                "success": false,
                "reason": if alternatives.is_closed { "closed" } else { "slot_unavailable" },
                "message": format!("{} on {} is not available.", start.format("%H:%M"), date),
                "alternatives": format_slots(&alternatives.slots),
            }));
        }

        let appointment = context.store.book(NewAppointment {
            customer_phone,
            customer_name,
            service,
            staff,
            date,
            start,
            end: add_minutes(start, duration),
        })?;

        Ok(json!({
            "success": true,
            "appointment": appointment_json(&appointment),
        }))
    }
}

// ---------------------------------------------------------------------------
// cancel_appointment
// ---------------------------------------------------------------------------

pub struct CancelAppointmentTool {
    context: Arc<ToolContext>,
}

impl CancelAppointmentTool {
    pub fn new(context: Arc<ToolContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Tool for CancelAppointmentTool {
    fn name(&self) -> &str {
        "cancel_appointment"
    }

    fn description(&self) -> &str {
        "Cancel a scheduled appointment, found by phone number"
    }

    fn schema(&self) -> InputSchema {
        InputSchema::object()
            .property(
                "customer_phone",
                PropertySchema::string("Caller's phone number"),
                true,
            )
            .property("date", PropertySchema::string("Appointment date"), false)
            .property("time", PropertySchema::string("Appointment start time"), false)
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let context = &self.context;
        let phone = required_str(&arguments, "customer_phone")?;
        let date = match optional_str(&arguments, "date") {
            Some(text) => Some(context.parse_date(text)?),
            None => None,
        };
        let time = match optional_str(&arguments, "time") {
            Some(text) => Some(context.parse_time(text)?),
            None => None,
        };

        let appointment = match find_single_appointment(context, phone, date, time) {
            Ok(appointment) => appointment,
            Err(outcome) => return outcome,
        };

        let cancelled = context.store.cancel(appointment.id)?;
        Ok(json!({
            "success": true,
            "cancelled": appointment_json(&cancelled),
        }))
    }
}

// ---------------------------------------------------------------------------
// reschedule_appointment
// ---------------------------------------------------------------------------

pub struct RescheduleAppointmentTool {
    context: Arc<ToolContext>,
}

impl RescheduleAppointmentTool {
    pub fn new(context: Arc<ToolContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Tool for RescheduleAppointmentTool {
    fn name(&self) -> &str {
        "reschedule_appointment"
    }

    fn description(&self) -> &str {
        "Move a scheduled appointment to a new date or time"
    }

    fn schema(&self) -> InputSchema {
        InputSchema::object()
            .property(
                "customer_phone",
                PropertySchema::string("Caller's phone number"),
                true,
            )
            .property(
                "date",
                PropertySchema::string("Date of the existing appointment"),
                false,
            )
            .property(
                "time",
                PropertySchema::string("Start time of the existing appointment"),
                false,
            )
            .property("new_date", PropertySchema::string("New date"), false)
            .property("new_time", PropertySchema::string("New start time"), false)
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let context = &self.context;
        let phone = required_str(&arguments, "customer_phone")?;
        let date = match optional_str(&arguments, "date") {
            Some(text) => Some(context.parse_date(text)?),
            None => None,
        };
        let time = match optional_str(&arguments, "time") {
            Some(text) => Some(context.parse_time(text)?),
            None => None,
        };

        let appointment = match find_single_appointment(context, phone, date, time) {
            Ok(appointment) => appointment,
            Err(outcome) => return outcome,
        };

        let Some(new_time_text) = optional_str(&arguments, "new_time") else {
            // Without a target slot there is nothing to move yet; hand the
            // current booking back so the agent can ask for one
            return Ok(json!({
                "success": false,
                "reason": "need_new_time",
                "message": "Ask the caller what new date and time they would like.",
                "current": appointment_json(&appointment),
            }));
        };

        let new_date = match optional_str(&arguments, "new_date") {
            Some(text) => context.parse_date(text)?,
            None => appointment.date,
        };
        let new_start = context.parse_time(new_time_text)?;
        context.reject_past(new_date, Some(new_start))?;

        let duration = (appointment.end - appointment.start).num_minutes() as u32;
        let booked: Vec<_> = context
            .store
            .scheduled_on(new_date)
            .into_iter()
            .filter(|a| a.id != appointment.id)
            .collect();

        if !slot_is_free(
            &context.profile,
            &booked,
            new_date,
            new_start,
            duration,
            appointment.staff.as_deref(),
        ) {
            let alternatives = available_slots(
                &context.profile,
                &booked,
                &SlotQuery {
                    date: new_date,
                    duration_minutes: duration,
                    staff: appointment.staff.clone(),
                    requested_time: Some(new_start),
                },
            );
            return Ok(json!({
                "success": false,
                "reason": if alternatives.is_closed { "closed" } else { "slot_unavailable" },
                "message": format!("{} on {} is not available.", new_start.format("%H:%M"), new_date),
                "alternatives": format_slots(&alternatives.slots),
                "current": appointment_json(&appointment),
            }));
        }

        let moved = context.store.reschedule(
            appointment.id,
            new_date,
            new_start,
            add_minutes(new_start, duration),
        )?;

        Ok(json!({
            "success": true,
            "rescheduled": appointment_json(&moved),
            "previous": {
                "date": appointment.date.format("%Y-%m-%d").to_string(),
                "start": appointment.start.format("%H:%M").to_string(),
            },
        }))
    }
}

// ---------------------------------------------------------------------------
// get_customer_appointments
// ---------------------------------------------------------------------------

pub struct GetCustomerAppointmentsTool {
    context: Arc<ToolContext>,
}

impl GetCustomerAppointmentsTool {
    pub fn new(context: Arc<ToolContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Tool for GetCustomerAppointmentsTool {
    fn name(&self) -> &str {
        "get_customer_appointments"
    }

    fn description(&self) -> &str {
        "List a caller's scheduled appointments by phone number"
    }

    fn schema(&self) -> InputSchema {
        InputSchema::object().property(
            "customer_phone",
            PropertySchema::string("Caller's phone number"),
            true,
        )
    }

    async fn execute(&self, arguments: Value) -> Result<Value, ToolError> {
        let phone = required_str(&arguments, "customer_phone")?;
        let appointments = self.context.store.scheduled_for(phone);
        let customer = self.context.store.customer(phone);

        Ok(json!({
            "customer_name": customer.map(|c| c.name),
            "count": appointments.len(),
            "appointments": appointments.iter().map(appointment_json).collect::<Vec<_>>(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datetime::FixedClock;
    use crate::store::InMemoryStore;
    use chrono::NaiveDate;

    fn context() -> Arc<ToolContext> {
        let profile: BusinessProfile = serde_yaml::from_str(
            r#"
name: Harbor Cuts
services:
  - name: Haircut
    duration_minutes: 30
    price: 40.0
  - name: Color
    duration_minutes: 90
staff:
  - name: Dana
    services: [Haircut]
hours:
  tuesday: { open: "09:00", close: "17:00" }
  wednesday: { open: "09:00", close: "17:00" }
booking:
  buffer_minutes: 10
  slot_step_minutes: 15
  max_suggestions: 6
"#,
        )
        .unwrap();

        // Tuesday morning
        let now = NaiveDate::from_ymd_opt(2026, 9, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();

        ToolContext::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(profile),
            Arc::new(FixedClock(now)),
        )
    }

    fn booking_args() -> Value {
        json!({
            "customer_name": "Sam Carter",
            "customer_phone": "555-123-4567",
            "service": "Haircut",
            "date": "today",
            "time": "10:00",
        })
    }

    #[tokio::test]
    async fn test_get_services() {
        let tool = GetServicesTool::new(context());
        let result = tool.execute(json!({})).await.unwrap();
        assert_eq!(result["services"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_check_availability_closed_day() {
        let tool = CheckAvailabilityTool::new(context());
        let result = tool
            .execute(json!({ "service": "Haircut", "date": "friday" }))
            .await
            .unwrap();
        assert_eq!(result["is_closed"], true);
        assert!(result["message"].as_str().unwrap().contains("Friday"));
    }

    #[tokio::test]
    async fn test_check_availability_unknown_service() {
        let tool = CheckAvailabilityTool::new(context());
        let result = tool
            .execute(json!({ "service": "Massage", "date": "today" }))
            .await;
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }

    #[tokio::test]
    async fn test_book_then_rebook_offers_alternatives() {
        let context = context();
        let tool = BookAppointmentTool::new(context.clone());

        let first = tool.execute(booking_args()).await.unwrap();
        assert_eq!(first["success"], true);

        // Same slot again: not an error, a structured refusal with options
        let mut again = booking_args();
        again["customer_name"] = json!("Jo Bloom");
        again["customer_phone"] = json!("555-999-0000");
        let second = tool.execute(again).await.unwrap();
        assert_eq!(second["success"], false);
        assert_eq!(second["reason"], "slot_unavailable");
        assert!(!second["alternatives"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_book_rejects_past() {
        let tool = BookAppointmentTool::new(context());
        let mut args = booking_args();
        args["time"] = json!("7am");
        let result = tool.execute(args).await;
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }

    #[tokio::test]
    async fn test_cancel_flow() {
        let context = context();
        BookAppointmentTool::new(context.clone())
            .execute(booking_args())
            .await
            .unwrap();

        let tool = CancelAppointmentTool::new(context.clone());
        let result = tool
            .execute(json!({ "customer_phone": "5551234567" }))
            .await
            .unwrap();
        assert_eq!(result["success"], true);

        // Nothing left to cancel
        let again = tool
            .execute(json!({ "customer_phone": "5551234567" }))
            .await;
        assert!(matches!(again, Err(ToolError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_cancel_multiple_matches_asks() {
        let context = context();
        let book = BookAppointmentTool::new(context.clone());
        book.execute(booking_args()).await.unwrap();
        let mut second = booking_args();
        second["time"] = json!("14:00");
        book.execute(second).await.unwrap();

        let result = CancelAppointmentTool::new(context)
            .execute(json!({ "customer_phone": "5551234567" }))
            .await
            .unwrap();
        assert_eq!(result["success"], false);
        assert_eq!(result["reason"], "multiple_matches");
        assert_eq!(result["appointments"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_reschedule_needs_new_time() {
        let context = context();
        BookAppointmentTool::new(context.clone())
            .execute(booking_args())
            .await
            .unwrap();

        let result = RescheduleAppointmentTool::new(context)
            .execute(json!({ "customer_phone": "5551234567" }))
            .await
            .unwrap();
        assert_eq!(result["success"], false);
        assert_eq!(result["reason"], "need_new_time");
        assert_eq!(result["current"]["start"], "10:00");
    }

    #[tokio::test]
    async fn test_reschedule_moves_appointment() {
        let context = context();
        BookAppointmentTool::new(context.clone())
            .execute(booking_args())
            .await
            .unwrap();

        let result = RescheduleAppointmentTool::new(context.clone())
            .execute(json!({
                "customer_phone": "5551234567",
                "new_date": "2026-09-02",
                "new_time": "11:00",
            }))
            .await
            .unwrap();
        assert_eq!(result["success"], true);
        assert_eq!(result["rescheduled"]["start"], "11:00");
        assert_eq!(result["previous"]["start"], "10:00");

        // Only the moved booking remains
        let listed = GetCustomerAppointmentsTool::new(context)
            .execute(json!({ "customer_phone": "5551234567" }))
            .await
            .unwrap();
        assert_eq!(listed["count"], 1);
        assert_eq!(listed["appointments"][0]["date"], "2026-09-02");
    }

    #[tokio::test]
    async fn test_get_staff_filters_by_service() {
        let tool = GetStaffTool::new(context());
        let all = tool.execute(json!({})).await.unwrap();
        assert_eq!(all["staff"].as_array().unwrap().len(), 1);

        let for_color = tool.execute(json!({ "service": "Color" })).await.unwrap();
        assert!(for_color["staff"].as_array().unwrap().is_empty());
    }
}
