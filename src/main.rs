//! TravelHub CLI - Multi-step Listing Form Core
//!
//! This is a demonstration CLI for the TravelHub library.

use std::time::Duration;
use travelhub::listing::{accommodation, experience};
use travelhub::prelude::*;

fn main() {
    env_logger::init();

    println!("🧳 TravelHub - Listing Form Core v{}", travelhub::VERSION);
    println!();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        return;
    }

    match args[1].as_str() {
        "demo" => run_demo(),
        "schema" => {
            if args.len() < 3 {
                eprintln!("Error: Please specify a form (accommodation, experience, registration)");
                return;
            }
            print_schema(&args[2]);
        }
        "strength" => {
            if args.len() < 3 {
                eprintln!("Error: Please specify a password to score");
                return;
            }
            print_strength(&args[2]);
        }
        "help" | "--help" | "-h" => print_usage(&args[0]),
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            print_usage(&args[0]);
        }
    }
}

fn print_usage(program: &str) {
    println!("Usage: {} <command> [options]", program);
    println!();
    println!("Commands:");
    println!("  demo              Walk an accommodation listing through the form flow");
    println!("  schema <form>     Show the fields and constraints of a form");
    println!("  strength <pw>     Score a password from 0 to 5");
    println!("  help              Show this help message");
    println!();
    println!("Forms:");
    println!("  accommodation, experience, registration");
}

fn print_schema(form: &str) {
    let schema = match form {
        "accommodation" => accommodation::schema(),
        "experience" => experience::schema(),
        "registration" => travelhub::auth::registration_schema(),
        _ => {
            eprintln!("Unknown form: {}", form);
            eprintln!("Use 'accommodation', 'experience' or 'registration'.");
            return;
        }
    };

    println!("Fields of the {} form ({} total):", form, schema.len());
    println!();
    for field in schema.fields() {
        let required = if field.required { "" } else { " (optional)" };
        println!(
            "  • {} [{:?}]{}",
            field.display_name, field.field_type, required
        );
        for constraint in &field.constraints {
            println!("      - {}", constraint.description());
        }
    }
}

fn print_strength(password: &str) {
    let score = password_strength(password);
    let bar: String = (0..5).map(|i| if i < score { '█' } else { '░' }).collect();
    println!("Strength: {} {}/5", bar, score);
}

fn run_demo() {
    let flow = match StepFlow::new(accommodation::schema(), accommodation::steps()) {
        Ok(flow) => flow,
        Err(e) => {
            eprintln!("❌ Flow construction failed: {}", e);
            return;
        }
    };

    let backend = MockBackend::new().with_delay(Duration::from_millis(300));
    let mut session = FormSession::new(flow, backend);

    // Step 1: Basic Information
    println!("📝 Step 1: Basic Information");
    let draft = session.draft_mut();
    draft.set("title", Value::String("Seaside Villa Retreat".into()));
    draft.set(
        "description",
        Value::String("A quiet villa a short walk from the beach.".into()),
    );

    // A missing property type keeps us on step 1.
    match session.advance() {
        Advance::Stayed(errors) => {
            for (field, message) in errors.iter() {
                println!("   ⚠️  {}: {}", field, message);
            }
        }
        other => println!("   unexpected transition: {:?}", other),
    }

    session
        .draft_mut()
        .set("property_type", Value::String("Villa".into()));
    report(session.advance());

    // Step 2: Location
    println!("📝 Step 2: Location");
    let draft = session.draft_mut();
    draft.set("address", Value::String("12 Ocean Drive".into()));
    draft.set("city", Value::String("Lagos".into()));
    draft.set("country", Value::String("Portugal".into()));
    report(session.advance());

    // Step 3: Details & Pricing
    println!("📝 Step 3: Details & Pricing");
    let draft = session.draft_mut();
    draft.set("price", Value::Float(100.0));
    draft.set("currency", Value::String("EUR".into()));
    draft.set("max_guests", Value::Integer(4));
    draft.set("bedrooms", Value::Integer(2));
    draft.set("beds", Value::Integer(3));
    draft.set("bathrooms", Value::Integer(1));
    report(session.advance());

    // Step 4: Amenities
    println!("📝 Step 4: Amenities");
    let draft = session.draft_mut();
    draft.push_item(accommodation::AMENITIES_LIST, "WiFi");
    draft.push_item(accommodation::AMENITIES_LIST, "Pool");
    report(session.advance());

    // Step 5: Availability
    println!("📝 Step 5: Availability");
    let draft = session.draft_mut();
    draft.set(
        "check_in",
        Value::Date(time::macros::date!(2025 - 07 - 01)),
    );
    draft.set(
        "check_out",
        Value::Date(time::macros::date!(2025 - 07 - 06)),
    );
    report(session.advance());

    // Step 6: Photos
    println!("📝 Step 6: Photos");
    session
        .draft_mut()
        .push_item(accommodation::IMAGES_LIST, "https://example.com/villa.jpg");

    println!("📤 Submitting...");
    match session.submit(accommodation::assemble) {
        Ok(receipt) => {
            println!("✅ Accepted as {}", receipt.id);

            if let Ok(submission) = accommodation::assemble(session.draft()) {
                if let Some(quote) = accommodation::quote(&submission) {
                    println!(
                        "💶 {} nights × {} {} = {} {}",
                        quote.nights,
                        quote.nightly_rate,
                        submission.currency,
                        quote.grand_total(),
                        submission.currency
                    );
                }
            }
        }
        Err(e) => eprintln!("❌ Submission failed: {}", e),
    }
}

fn report(advance: Advance) {
    match advance {
        Advance::Moved(step) => println!("   → moved to step {}", step),
        Advance::Stayed(errors) => println!("   ⚠️  stayed: {}", errors),
        Advance::AtEnd => println!("   → already at the last step"),
    }
}
