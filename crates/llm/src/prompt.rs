//! System prompt construction
//!
//! Builds the receptionist system prompt from the business profile, the
//! registered tool definitions, and today's date. The prompt pins the model
//! to the JSON decision contract the orchestrator parses.

use chrono::{Datelike, NaiveDate, Weekday};
use serde_json::Value;
use std::fmt::Write;

use frontdesk_config::BusinessProfile;

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn day_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

fn hours_summary(profile: &BusinessProfile) -> String {
    let mut lines = String::new();
    for weekday in WEEKDAYS {
        match profile.hours.for_weekday(weekday) {
            Some(hours) => {
                let _ = writeln!(
                    lines,
                    "- {}: {} to {}",
                    day_label(weekday),
                    hours.open.format("%H:%M"),
                    hours.close.format("%H:%M"),
                );
            },
            None => {
                let _ = writeln!(lines, "- {}: closed", day_label(weekday));
            },
        }
    }
    lines
}

fn services_summary(profile: &BusinessProfile) -> String {
    let mut lines = String::new();
    for service in &profile.services {
        let _ = write!(lines, "- {} ({} min", service.name, service.duration_minutes);
        if let Some(price) = service.price {
            let _ = write!(lines, ", ${:.2}", price);
        }
        let _ = write!(lines, ")");
        if let Some(description) = &service.description {
            let _ = write!(lines, ": {}", description);
        }
        lines.push('\n');
    }
    lines
}

fn staff_summary(profile: &BusinessProfile) -> String {
    if profile.staff.is_empty() {
        return "Appointments are not assigned to a specific staff member.\n".to_string();
    }
    let mut lines = String::new();
    for staff in &profile.staff {
        let _ = write!(lines, "- {}", staff.name);
        if let Some(role) = &staff.role {
            let _ = write!(lines, " ({})", role);
        }
        if !staff.services.is_empty() {
            let _ = write!(lines, ", handles: {}", staff.services.join(", "));
        }
        lines.push('\n');
    }
    lines
}

/// Build the system prompt for one call
pub fn build_system_prompt(
    profile: &BusinessProfile,
    tool_definitions: &[Value],
    today: NaiveDate,
) -> String {
    let tools_json =
        serde_json::to_string_pretty(tool_definitions).unwrap_or_else(|_| "[]".to_string());

    let mut prompt = format!(
        "You are the phone receptionist for {name}. You are speaking with a \
caller over the phone; everything you write as a reply will be read aloud.\n\n",
        name = profile.name,
    );

    if let Some(description) = &profile.description {
        let _ = writeln!(prompt, "About the business: {}\n", description);
    }

    let _ = writeln!(
        prompt,
        "Today is {} ({}).\n",
        day_label(today.weekday()),
        today.format("%Y-%m-%d"),
    );

    let _ = writeln!(prompt, "## Services\n{}", services_summary(profile));
    let _ = writeln!(prompt, "## Staff\n{}", staff_summary(profile));
    let _ = writeln!(prompt, "## Opening hours\n{}", hours_summary(profile));

    let _ = writeln!(prompt, "## Tone\n{}\n", profile.personality.style);

    let _ = writeln!(
        prompt,
        "## Tools\nYou can call these tools to look things up and manage \
appointments:\n\n{}\n",
        tools_json,
    );

    prompt.push_str(
        "## How to respond\n\
Respond with a single JSON object, nothing else:\n\n\
{\"reply\": \"text to speak, or null\", \"tool_calls\": [{\"name\": \"tool_name\", \"arguments\": {}}], \"done\": false}\n\n\
Rules:\n\
- To look something up or change a booking, return tool_calls and leave reply null. \
You will receive each tool's result and then decide again.\n\
- To speak to the caller, set reply and leave tool_calls empty. \
Keep replies short and conversational; never read out JSON, IDs, or lists of more \
than three options.\n\
- Always confirm service, date, time, name, and phone number with the caller \
before booking.\n\
- If a requested slot is taken, offer the closest alternatives from the tool result.\n\
- Set done to true only when the caller is finished and you have said goodbye.\n",
    );

    prompt
}
