//! Experience listings: schema, four-step flow, schedules and assembler.

use crate::core::error::AssemblyError;
use crate::core::types::FieldType;
use crate::form::draft::Draft;
use crate::form::step::StepDefinition;
use crate::listing::{
    optional_str, require_float, require_list, require_str, require_u32, Location, CURRENCIES,
};
use crate::schema::field::FieldDefinition;
use crate::schema::form::{FormSchema, Refinement};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use time::macros::format_description;
use time::Date;

/// Experience categories offered in the listing form.
pub const EXPERIENCE_TYPES: &[&str] = &[
    "tour",
    "activity",
    "workshop",
    "adventure",
    "cultural",
    "food",
];

/// Languages the host can offer the experience in.
pub const LANGUAGES: &[&str] = &[
    "english", "spanish", "french", "german", "italian", "japanese", "chinese", "arabic",
];

/// 24-hour `HH:MM` times, e.g. "09:00" or "23:59".
pub const TIME_OF_DAY_PATTERN: &str = r"^([0-1]?[0-9]|2[0-3]):[0-5][0-9]$";

/// Auxiliary list of what the experience includes.
pub const INCLUDED_LIST: &str = "included";
/// Auxiliary list of what the experience does not include.
pub const EXCLUDED_LIST: &str = "excluded";
/// Auxiliary list of participant requirements.
pub const REQUIREMENTS_LIST: &str = "requirements";
/// Auxiliary list of weekly schedule entries (canonical slot strings).
pub const SCHEDULE_LIST: &str = "schedule";
/// Auxiliary list of one-off date entries (canonical slot strings).
pub const CUSTOM_DATES_LIST: &str = "custom_dates";

fn time_of_day_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(TIME_OF_DAY_PATTERN).expect("time pattern compiles"))
}

/// How long an experience runs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    /// Duration measured in minutes.
    Minutes,
    /// Duration measured in hours.
    Hours,
    /// Duration measured in days.
    Days,
}

impl DurationUnit {
    /// The closed option list used by the schema.
    pub const OPTIONS: &'static [&'static str] = &["minutes", "hours", "days"];
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DurationUnit::Minutes => "minutes",
            DurationUnit::Hours => "hours",
            DurationUnit::Days => "days",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for DurationUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minutes" => Ok(DurationUnit::Minutes),
            "hours" => Ok(DurationUnit::Hours),
            "days" => Ok(DurationUnit::Days),
            other => Err(format!("unknown duration unit '{}'", other)),
        }
    }
}

/// Duration of one run of the experience.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Duration {
    /// Length in `unit`s, always positive.
    pub length: f64,
    /// Unit the length is expressed in.
    pub unit: DurationUnit,
}

/// Allowed party size range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupSize {
    /// Smallest group the host accepts.
    pub min: u32,
    /// Largest group the host accepts (>= min).
    pub max: u32,
}

/// One weekly recurring time slot.
///
/// Slots travel through the draft's auxiliary lists in a canonical string
/// form (`"<day> <start>-<end>"`, e.g. `"1 09:00-12:00"`), so schedule
/// entries are added, removed and frozen exactly like any other free-text
/// list item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleSlot {
    /// Day of week, 0 = Sunday through 6 = Saturday.
    pub day_of_week: u8,
    /// Start time, `HH:MM` 24-hour.
    pub start_time: String,
    /// End time, `HH:MM` 24-hour.
    pub end_time: String,
}

impl ScheduleSlot {
    /// Create a slot, checking the day index and time formats.
    pub fn new(day_of_week: u8, start_time: &str, end_time: &str) -> Result<Self, String> {
        if day_of_week > 6 {
            return Err(format!("day of week must be 0-6, got {}", day_of_week));
        }
        for time in [start_time, end_time] {
            if !time_of_day_regex().is_match(time) {
                return Err(format!(
                    "'{}' is not a valid time in 24-hour format (HH:MM)",
                    time
                ));
            }
        }
        Ok(Self {
            day_of_week,
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
        })
    }
}

impl fmt::Display for ScheduleSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{}",
            self.day_of_week, self.start_time, self.end_time
        )
    }
}

impl FromStr for ScheduleSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (day, times) = s
            .split_once(' ')
            .ok_or_else(|| format!("malformed schedule slot '{}'", s))?;
        let day: u8 = day
            .parse()
            .map_err(|_| format!("malformed day of week in '{}'", s))?;
        let (start, end) = times
            .split_once('-')
            .ok_or_else(|| format!("malformed time range in '{}'", s))?;
        Self::new(day, start, end)
    }
}

/// One-off availability on a specific calendar date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomDateSlot {
    /// The calendar date.
    pub date: Date,
    /// Start time, `HH:MM` 24-hour.
    pub start_time: String,
    /// End time, `HH:MM` 24-hour.
    pub end_time: String,
}

impl CustomDateSlot {
    /// Create a slot, checking the time formats.
    pub fn new(date: Date, start_time: &str, end_time: &str) -> Result<Self, String> {
        for time in [start_time, end_time] {
            if !time_of_day_regex().is_match(time) {
                return Err(format!(
                    "'{}' is not a valid time in 24-hour format (HH:MM)",
                    time
                ));
            }
        }
        Ok(Self {
            date,
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
        })
    }
}

impl fmt::Display for CustomDateSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}-{}", self.date, self.start_time, self.end_time)
    }
}

impl FromStr for CustomDateSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (date, times) = s
            .split_once(' ')
            .ok_or_else(|| format!("malformed custom date slot '{}'", s))?;
        let format = format_description!("[year]-[month]-[day]");
        let date = Date::parse(date, &format).map_err(|_| format!("malformed date in '{}'", s))?;
        let (start, end) = times
            .split_once('-')
            .ok_or_else(|| format!("malformed time range in '{}'", s))?;
        Self::new(date, start, end)
    }
}

/// Append a validated weekly slot to the draft's schedule list.
pub fn add_schedule_slot(draft: &mut Draft, slot: &ScheduleSlot) {
    draft.push_item(SCHEDULE_LIST, &slot.to_string());
}

/// Append a validated one-off slot to the draft's custom-date list.
pub fn add_custom_date(draft: &mut Draft, slot: &CustomDateSlot) {
    draft.push_item(CUSTOM_DATES_LIST, &slot.to_string());
}

/// Schema for the experience listing form.
pub fn schema() -> FormSchema {
    FormSchema::new()
        .field(FieldDefinition::required("title", FieldType::String).with_min_length(5))
        .field(FieldDefinition::required("description", FieldType::String).with_min_length(20))
        .field(
            FieldDefinition::required("experience_type", FieldType::String)
                .with_display_name("Experience type")
                .one_of(EXPERIENCE_TYPES.iter().copied()),
        )
        .field(FieldDefinition::required("address", FieldType::String).with_min_length(5))
        .field(FieldDefinition::required("city", FieldType::String).with_min_length(2))
        .field(FieldDefinition::optional("state", FieldType::String))
        .field(FieldDefinition::required("country", FieldType::String).with_min_length(2))
        .field(FieldDefinition::required("price", FieldType::Float).positive())
        .field(
            FieldDefinition::required("currency", FieldType::String)
                .one_of(CURRENCIES.iter().copied()),
        )
        .field(
            FieldDefinition::required("duration_length", FieldType::Float)
                .with_display_name("Duration")
                .positive(),
        )
        .field(
            FieldDefinition::required("duration_unit", FieldType::String)
                .with_display_name("Duration unit")
                .one_of(DurationUnit::OPTIONS.iter().copied()),
        )
        .field(
            FieldDefinition::required("group_size_min", FieldType::Float)
                .with_display_name("Minimum group size")
                .whole()
                .non_negative(),
        )
        .field(
            FieldDefinition::required("group_size_max", FieldType::Float)
                .with_display_name("Maximum group size")
                .whole()
                .positive(),
        )
        .field(FieldDefinition::required("languages", FieldType::List).with_min_items(1))
        .field(FieldDefinition::required("images", FieldType::List).with_min_items(1))
        .refine(Refinement::new(
            "group_size_ordering",
            &["group_size_min", "group_size_max"],
            "group_size_max",
            "Maximum group size must be greater than or equal to minimum group size",
            |record| {
                match (
                    record.float("group_size_min"),
                    record.float("group_size_max"),
                ) {
                    (Some(min), Some(max)) => max >= min,
                    _ => true,
                }
            },
        ))
}

/// The four screens of the experience listing form.
pub fn steps() -> Vec<StepDefinition> {
    vec![
        StepDefinition::new(
            "Basic Info",
            &["title", "description", "experience_type", "languages"],
        ),
        StepDefinition::new(
            "Details",
            &[
                "price",
                "currency",
                "duration_length",
                "duration_unit",
                "group_size_min",
                "group_size_max",
                "address",
                "city",
                "state",
                "country",
            ],
        ),
        StepDefinition::new("Inclusions", &[]),
        StepDefinition::new("Availability", &["images"]),
    ]
}

/// When the experience runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExperienceAvailability {
    /// Weekly recurring slots.
    pub schedule: Vec<ScheduleSlot>,
    /// One-off dated slots.
    pub custom_dates: Vec<CustomDateSlot>,
}

/// An assembled, immutable experience listing ready for submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExperienceSubmission {
    /// Listing headline.
    pub title: String,
    /// Long-form description.
    pub description: String,
    /// Experience category, e.g. "tour".
    #[serde(rename = "type")]
    pub experience_type: String,
    /// Meeting point.
    pub location: Location,
    /// Price per participant.
    pub price: f64,
    /// Currency code for the price.
    pub currency: String,
    /// How long one run takes.
    pub duration: Duration,
    /// Accepted party size range.
    pub group_size: GroupSize,
    /// What the price includes.
    pub included: Vec<String>,
    /// What the price does not include.
    pub excluded: Vec<String>,
    /// Participant requirements.
    pub requirements: Vec<String>,
    /// Uploaded photo URLs.
    pub images: Vec<String>,
    /// Languages the host offers.
    pub languages: Vec<String>,
    /// When the experience runs.
    pub availability: ExperienceAvailability,
}

fn parse_slots<T: FromStr<Err = String>>(
    list: &str,
    items: &[String],
) -> Result<Vec<T>, AssemblyError> {
    items
        .iter()
        .map(|item| {
            item.parse().map_err(|reason| AssemblyError::InvalidItem {
                list: list.to_string(),
                item: item.clone(),
                reason,
            })
        })
        .collect()
}

/// Merge a validated draft into an [`ExperienceSubmission`].
///
/// Pure and idempotent, like the accommodation assembler. Schedule and
/// custom-date entries are parsed back out of their canonical list form;
/// an unparsable entry means something bypassed the slot constructors and
/// is reported against the offending list.
pub fn assemble(draft: &Draft) -> Result<ExperienceSubmission, AssemblyError> {
    let record = draft.record();

    let submission = (|| {
        let unit_raw = require_str(record, "duration_unit")?;
        let unit = unit_raw
            .parse::<DurationUnit>()
            .map_err(|_| AssemblyError::WrongType {
                field: "duration_unit".to_string(),
                expected: "one of minutes/hours/days",
            })?;

        Ok(ExperienceSubmission {
            title: require_str(record, "title")?,
            description: require_str(record, "description")?,
            experience_type: require_str(record, "experience_type")?,
            location: Location {
                address: require_str(record, "address")?,
                city: require_str(record, "city")?,
                state: optional_str(record, "state"),
                country: require_str(record, "country")?,
            },
            price: require_float(record, "price")?,
            currency: require_str(record, "currency")?,
            duration: Duration {
                length: require_float(record, "duration_length")?,
                unit,
            },
            group_size: GroupSize {
                min: require_u32(record, "group_size_min")?,
                max: require_u32(record, "group_size_max")?,
            },
            included: draft.items(INCLUDED_LIST).to_vec(),
            excluded: draft.items(EXCLUDED_LIST).to_vec(),
            requirements: draft.items(REQUIREMENTS_LIST).to_vec(),
            images: require_list(record, "images")?,
            languages: require_list(record, "languages")?,
            availability: ExperienceAvailability {
                schedule: parse_slots(SCHEDULE_LIST, draft.items(SCHEDULE_LIST))?,
                custom_dates: parse_slots(CUSTOM_DATES_LIST, draft.items(CUSTOM_DATES_LIST))?,
            },
        })
    })();

    if let Err(ref err) = submission {
        log::error!("experience draft failed to assemble: {}", err);
    }
    submission
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Value;
    use crate::form::step::{Advance, StepFlow};
    use time::macros::date;

    fn complete_draft() -> Draft {
        let mut draft = Draft::new();
        draft.set("title", Value::String("Historic City Walking Tour".into()));
        draft.set(
            "description",
            Value::String("Two hours through the old town with a local guide.".into()),
        );
        draft.set("experience_type", Value::String("tour".into()));
        draft.set("address", Value::String("Main Square Fountain".into()));
        draft.set("city", Value::String("Porto".into()));
        draft.set("country", Value::String("Portugal".into()));
        draft.set("price", Value::Float(35.0));
        draft.set("currency", Value::String("EUR".into()));
        draft.set("duration_length", Value::Float(2.0));
        draft.set("duration_unit", Value::String("hours".into()));
        draft.set("group_size_min", Value::Integer(1));
        draft.set("group_size_max", Value::Integer(10));
        draft.set(
            "languages",
            Value::List(vec!["english".into(), "spanish".into()]),
        );
        draft.set(
            "images",
            Value::List(vec!["https://example.com/tour.jpg".into()]),
        );
        draft.push_item(INCLUDED_LIST, "Guided tour");
        draft.push_item(INCLUDED_LIST, "Entrance fees");
        draft.push_item(EXCLUDED_LIST, "Meals");
        draft.push_item(REQUIREMENTS_LIST, "Comfortable walking shoes");
        add_schedule_slot(
            &mut draft,
            &ScheduleSlot::new(1, "09:00", "12:00").unwrap(),
        );
        add_custom_date(
            &mut draft,
            &CustomDateSlot::new(date!(2025 - 07 - 04), "14:00", "17:00").unwrap(),
        );
        draft
    }

    #[test]
    fn test_flow_covers_all_required_fields() {
        assert!(StepFlow::new(schema(), steps()).is_ok());
    }

    #[test]
    fn test_inverted_group_size_blocks_the_details_step() {
        let mut flow = StepFlow::new(schema(), steps()).unwrap();
        let mut draft = complete_draft();
        draft.set("group_size_min", Value::Integer(5));
        draft.set("group_size_max", Value::Integer(3));

        // Step 1 has no group size fields and passes.
        assert_eq!(flow.advance(draft.record()), Advance::Moved(2));

        match flow.advance(draft.record()) {
            Advance::Stayed(errors) => {
                assert_eq!(errors.len(), 1);
                assert!(errors.get("group_size_max").unwrap().contains("greater than or equal"));
            }
            other => panic!("expected Stayed, got {:?}", other),
        }

        draft.set("group_size_min", Value::Integer(1));
        draft.set("group_size_max", Value::Integer(10));
        assert_eq!(flow.advance(draft.record()), Advance::Moved(3));
    }

    #[test]
    fn test_schedule_slot_round_trips_canonical_form() {
        let slot = ScheduleSlot::new(1, "09:00", "12:00").unwrap();
        assert_eq!(slot.to_string(), "1 09:00-12:00");
        assert_eq!("1 09:00-12:00".parse::<ScheduleSlot>().unwrap(), slot);
    }

    #[test]
    fn test_schedule_slot_rejects_bad_input() {
        assert!(ScheduleSlot::new(7, "09:00", "12:00").is_err());
        assert!(ScheduleSlot::new(1, "25:00", "12:00").is_err());
        assert!(ScheduleSlot::new(1, "9am", "12:00").is_err());
        assert!("garbled".parse::<ScheduleSlot>().is_err());
    }

    #[test]
    fn test_custom_date_slot_round_trips_canonical_form() {
        let slot = CustomDateSlot::new(date!(2025 - 07 - 04), "14:00", "17:00").unwrap();
        assert_eq!(slot.to_string(), "2025-07-04 14:00-17:00");
        assert_eq!("2025-07-04 14:00-17:00".parse::<CustomDateSlot>().unwrap(), slot);
    }

    #[test]
    fn test_assemble_merges_everything() {
        let submission = assemble(&complete_draft()).unwrap();
        assert_eq!(submission.duration.unit, DurationUnit::Hours);
        assert_eq!(submission.group_size, GroupSize { min: 1, max: 10 });
        assert_eq!(submission.included, vec!["Guided tour", "Entrance fees"]);
        assert_eq!(submission.availability.schedule.len(), 1);
        assert_eq!(submission.availability.custom_dates.len(), 1);
        assert_eq!(
            submission.availability.schedule[0],
            ScheduleSlot::new(1, "09:00", "12:00").unwrap()
        );
    }

    #[test]
    fn test_assemble_is_idempotent() {
        let draft = complete_draft();
        assert_eq!(assemble(&draft).unwrap(), assemble(&draft).unwrap());
    }

    #[test]
    fn test_assemble_reports_corrupt_schedule_entry() {
        let mut draft = complete_draft();
        draft.push_item(SCHEDULE_LIST, "not a slot");

        match assemble(&draft) {
            Err(AssemblyError::InvalidItem { list, .. }) => assert_eq!(list, SCHEDULE_LIST),
            other => panic!("expected InvalidItem, got {:?}", other),
        }
    }

    #[test]
    fn test_assemble_names_the_missing_field() {
        let mut draft = complete_draft();
        draft.set("price", Value::None);
        assert_eq!(
            assemble(&draft),
            Err(AssemblyError::MissingField("price".into()))
        );
    }
}
