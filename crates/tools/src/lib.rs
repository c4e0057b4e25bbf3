//! Appointment tools for the voice agent
//!
//! Tool schemas and dispatch, the appointment store, business-hours slot
//! resolution, and the spoken date/time parsing the tools share.

pub mod appointments;
pub mod availability;
pub mod datetime;
pub mod error;
pub mod registry;
pub mod schema;
pub mod store;

pub use appointments::{
    BookAppointmentTool, CancelAppointmentTool, CheckAvailabilityTool,
    GetCustomerAppointmentsTool, GetServicesTool, GetStaffTool, RescheduleAppointmentTool,
    ToolContext,
};
pub use availability::{available_slots, slot_is_free, DayAvailability, SlotQuery};
pub use datetime::{parse_spoken_date, parse_spoken_time, Clock, FixedClock, ZoneClock};
pub use error::ToolError;
pub use registry::ToolRegistry;
pub use schema::{InputSchema, PropertySchema, PropertyType, Tool};
pub use store::{
    normalize_phone, Appointment, AppointmentStatus, AppointmentStore, Customer, InMemoryStore,
    NewAppointment, StoreError,
};

use std::sync::Arc;

/// Build the full appointment tool set over one shared context
pub fn appointment_registry(context: Arc<ToolContext>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(GetServicesTool::new(context.clone())));
    registry.register(Arc::new(GetStaffTool::new(context.clone())));
    registry.register(Arc::new(CheckAvailabilityTool::new(context.clone())));
    registry.register(Arc::new(BookAppointmentTool::new(context.clone())));
    registry.register(Arc::new(CancelAppointmentTool::new(context.clone())));
    registry.register(Arc::new(RescheduleAppointmentTool::new(context.clone())));
    registry.register(Arc::new(GetCustomerAppointmentsTool::new(context)));
    registry
}
