//! Accommodation listings: schema, six-step flow, assembler and booking.

use crate::core::error::AssemblyError;
use crate::core::types::FieldType;
use crate::form::draft::Draft;
use crate::form::step::StepDefinition;
use crate::listing::{
    optional_date, optional_str, require_float, require_str, require_u32, Location, CURRENCIES,
};
use crate::pricing::BookingQuote;
use crate::schema::field::FieldDefinition;
use crate::schema::form::FormSchema;
use crate::submit::SubmissionId;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

/// Property types offered in the listing form.
pub const ACCOMMODATION_TYPES: &[&str] = &[
    "Villa",
    "Apartment",
    "House",
    "Hotel Room",
    "Homestay",
    "Bungalow",
    "Resort",
    "Cottage",
];

/// Amenities the host can tick.
pub const AMENITIES: &[&str] = &[
    "WiFi",
    "Air Conditioning",
    "Kitchen",
    "Pool",
    "Free Parking",
    "Washing Machine",
    "TV",
    "Workspace",
    "Hot Tub",
    "BBQ Grill",
];

/// Auxiliary list holding the ticked amenities.
pub const AMENITIES_LIST: &str = "amenities";
/// Auxiliary list holding uploaded photo URLs.
pub const IMAGES_LIST: &str = "images";

/// Schema for the accommodation listing form.
pub fn schema() -> FormSchema {
    FormSchema::new()
        .field(FieldDefinition::required("title", FieldType::String).with_min_length(5))
        .field(FieldDefinition::required("description", FieldType::String).with_min_length(20))
        .field(
            FieldDefinition::required("property_type", FieldType::String)
                .with_display_name("Property type")
                .one_of(ACCOMMODATION_TYPES.iter().copied()),
        )
        .field(FieldDefinition::required("address", FieldType::String).with_min_length(5))
        .field(FieldDefinition::required("city", FieldType::String).with_min_length(2))
        .field(FieldDefinition::required("country", FieldType::String).with_min_length(2))
        .field(FieldDefinition::required("price", FieldType::Float).positive())
        .field(
            FieldDefinition::required("currency", FieldType::String)
                .one_of(CURRENCIES.iter().copied()),
        )
        .field(
            FieldDefinition::required("max_guests", FieldType::Float)
                .whole()
                .positive(),
        )
        .field(
            FieldDefinition::required("bedrooms", FieldType::Float)
                .whole()
                .positive(),
        )
        .field(
            FieldDefinition::required("beds", FieldType::Float)
                .whole()
                .positive(),
        )
        .field(
            FieldDefinition::required("bathrooms", FieldType::Float)
                .whole()
                .positive(),
        )
        .field(FieldDefinition::optional("check_in", FieldType::Date))
        .field(FieldDefinition::optional("check_out", FieldType::Date))
}

/// The six screens of the accommodation listing form.
///
/// The amenities and photos steps have no schema fields: they collect
/// auxiliary list items only, so forward navigation from them always
/// succeeds.
pub fn steps() -> Vec<StepDefinition> {
    vec![
        StepDefinition::new(
            "Basic Information",
            &["title", "description", "property_type"],
        ),
        StepDefinition::new("Location", &["address", "city", "country"]),
        StepDefinition::new(
            "Details & Pricing",
            &[
                "price",
                "currency",
                "max_guests",
                "bedrooms",
                "beds",
                "bathrooms",
            ],
        ),
        StepDefinition::new("Amenities", &[]),
        StepDefinition::new("Availability", &["check_in", "check_out"]),
        StepDefinition::new("Photos", &[]),
    ]
}

/// When a listing is open for bookings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Availability {
    /// First bookable date.
    pub start_date: Date,
    /// Last bookable date.
    pub end_date: Date,
}

/// An assembled, immutable accommodation listing ready for submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccommodationSubmission {
    /// Listing headline.
    pub title: String,
    /// Long-form description.
    pub description: String,
    /// Property type, e.g. "Villa".
    #[serde(rename = "type")]
    pub property_type: String,
    /// Where the property is.
    pub location: Location,
    /// Nightly price.
    pub price: f64,
    /// Currency code for the price.
    pub currency: String,
    /// Ticked amenities.
    pub amenities: Vec<String>,
    /// Maximum number of guests.
    pub max_guests: u32,
    /// Number of bedrooms.
    pub bedrooms: u32,
    /// Number of beds.
    pub beds: u32,
    /// Number of bathrooms.
    pub bathrooms: u32,
    /// Uploaded photo URLs.
    pub images: Vec<String>,
    /// Booking window, when provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<Availability>,
}

/// Merge a validated draft into an [`AccommodationSubmission`].
///
/// Pure: reads the draft without mutating it, so assembling twice from the
/// same draft yields structurally equal submissions. A missing field here
/// means the step flow failed to gate the draft and is logged as an
/// internal error.
pub fn assemble(draft: &Draft) -> Result<AccommodationSubmission, AssemblyError> {
    let record = draft.record();

    let submission = (|| {
        let availability = match (
            optional_date(record, "check_in"),
            optional_date(record, "check_out"),
        ) {
            (Some(start_date), Some(end_date)) => Some(Availability {
                start_date,
                end_date,
            }),
            _ => None,
        };

        Ok(AccommodationSubmission {
            title: require_str(record, "title")?,
            description: require_str(record, "description")?,
            property_type: require_str(record, "property_type")?,
            location: Location {
                address: require_str(record, "address")?,
                city: require_str(record, "city")?,
                state: optional_str(record, "state"),
                country: require_str(record, "country")?,
            },
            price: require_float(record, "price")?,
            currency: require_str(record, "currency")?,
            amenities: draft.items(AMENITIES_LIST).to_vec(),
            max_guests: require_u32(record, "max_guests")?,
            bedrooms: require_u32(record, "bedrooms")?,
            beds: require_u32(record, "beds")?,
            bathrooms: require_u32(record, "bathrooms")?,
            images: draft.items(IMAGES_LIST).to_vec(),
            availability,
        })
    })();

    if let Err(ref err) = submission {
        log::error!("accommodation draft failed to assemble: {}", err);
    }
    submission
}

/// Quote the stay covered by the listing's availability window, if any.
pub fn quote(submission: &AccommodationSubmission) -> Option<BookingQuote> {
    submission.availability.as_ref().map(|window| {
        BookingQuote::for_stay(submission.price, window.start_date, window.end_date)
    })
}

/// Lifecycle of a booking.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Awaiting confirmation.
    Pending,
    /// Confirmed and upcoming.
    Confirmed,
    /// Cancelled by either party.
    Cancelled,
    /// Stay has ended.
    Completed,
}

/// Payment state of a booking.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Payment not yet captured.
    Pending,
    /// Payment captured.
    Paid,
    /// Payment returned after cancellation.
    Refunded,
}

/// The record handed to the confirmation view after a successful
/// submission. Read-only for that view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    /// Identifier returned by the submission backend.
    pub id: SubmissionId,
    /// Account the booking belongs to.
    pub user_id: String,
    /// First night of the stay.
    pub check_in: Date,
    /// Checkout date.
    pub check_out: Date,
    /// Number of guests.
    pub guest_count: u32,
    /// Grand total, lodging plus fees.
    pub total_price: f64,
    /// Currency code for the total.
    pub currency: String,
    /// Booking lifecycle state.
    pub status: BookingStatus,
    /// Payment state.
    pub payment_status: PaymentStatus,
    /// When the booking was created.
    pub created_at: OffsetDateTime,
}

impl Booking {
    /// Build the confirmation record for a submitted listing.
    ///
    /// Returns `None` when the listing has no availability window to book.
    pub fn confirmed(
        submission: &AccommodationSubmission,
        id: SubmissionId,
        user_id: impl Into<String>,
    ) -> Option<Self> {
        let window = submission.availability.as_ref()?;
        let total = quote(submission)?.grand_total();
        Some(Self {
            id,
            user_id: user_id.into(),
            check_in: window.start_date,
            check_out: window.end_date,
            guest_count: submission.max_guests,
            total_price: total,
            currency: submission.currency.clone(),
            status: BookingStatus::Confirmed,
            payment_status: PaymentStatus::Paid,
            created_at: OffsetDateTime::now_utc(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Value;
    use crate::form::step::{Advance, StepFlow};
    use time::macros::date;

    pub(crate) fn complete_draft() -> Draft {
        let mut draft = Draft::new();
        draft.set("title", Value::String("Seaside Villa Retreat".into()));
        draft.set(
            "description",
            Value::String("A quiet villa a short walk from the beach.".into()),
        );
        draft.set("property_type", Value::String("Villa".into()));
        draft.set("address", Value::String("12 Ocean Drive".into()));
        draft.set("city", Value::String("Lagos".into()));
        draft.set("country", Value::String("Portugal".into()));
        draft.set("price", Value::Float(100.0));
        draft.set("currency", Value::String("EUR".into()));
        draft.set("max_guests", Value::Integer(4));
        draft.set("bedrooms", Value::Integer(2));
        draft.set("beds", Value::Integer(3));
        draft.set("bathrooms", Value::Integer(1));
        draft.set("check_in", Value::Date(date!(2025 - 07 - 01)));
        draft.set("check_out", Value::Date(date!(2025 - 07 - 06)));
        draft.push_item(AMENITIES_LIST, "WiFi");
        draft.push_item(AMENITIES_LIST, "Pool");
        draft.push_item(IMAGES_LIST, "https://example.com/villa.jpg");
        draft
    }

    #[test]
    fn test_flow_covers_all_required_fields() {
        assert!(StepFlow::new(schema(), steps()).is_ok());
    }

    #[test]
    fn test_full_walk_through_the_flow() {
        let mut flow = StepFlow::new(schema(), steps()).unwrap();
        let draft = complete_draft();

        for expected in 2..=6 {
            match flow.advance(draft.record()) {
                Advance::Moved(step) => assert_eq!(step, expected),
                other => panic!("stuck before step {}: {:?}", expected, other),
            }
        }
        assert!(flow.check_submit(draft.record()).is_ok());
    }

    #[test]
    fn test_assemble_merges_fields_and_lists() {
        let submission = assemble(&complete_draft()).unwrap();
        assert_eq!(submission.title, "Seaside Villa Retreat");
        assert_eq!(submission.property_type, "Villa");
        assert_eq!(submission.amenities, vec!["WiFi", "Pool"]);
        assert_eq!(submission.images.len(), 1);
        assert_eq!(
            submission.availability,
            Some(Availability {
                start_date: date!(2025 - 07 - 01),
                end_date: date!(2025 - 07 - 06),
            })
        );
    }

    #[test]
    fn test_assemble_is_idempotent() {
        let draft = complete_draft();
        assert_eq!(assemble(&draft).unwrap(), assemble(&draft).unwrap());
    }

    #[test]
    fn test_assemble_names_the_missing_field() {
        let mut draft = complete_draft();
        draft.set("city", Value::None);

        assert_eq!(
            assemble(&draft),
            Err(AssemblyError::MissingField("city".into()))
        );
    }

    #[test]
    fn test_quote_uses_availability_window() {
        let submission = assemble(&complete_draft()).unwrap();
        let quote = quote(&submission).unwrap();
        assert_eq!(quote.nights, 5);
        assert_eq!(quote.lodging_total(), 500.0);
    }

    #[test]
    fn test_no_quote_without_dates() {
        let mut draft = complete_draft();
        draft.set("check_in", Value::None);
        let submission = assemble(&draft).unwrap();
        assert_eq!(quote(&submission), None);
    }

    #[test]
    fn test_booking_confirmation_totals() {
        let submission = assemble(&complete_draft()).unwrap();
        let booking = Booking::confirmed(&submission, SubmissionId::new(), "user-1").unwrap();

        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.payment_status, PaymentStatus::Paid);
        assert_eq!(booking.total_price, 500.0);
        assert_eq!(booking.currency, "EUR");
    }

    #[test]
    fn test_serialized_form_uses_type_key() {
        let submission = assemble(&complete_draft()).unwrap();
        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json["type"], "Villa");
        assert!(json.get("property_type").is_none());
        assert!(json["location"].get("state").is_none());
    }
}
