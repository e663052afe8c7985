use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use spendbook::{
    Amount, Expense, ExpenseType, count_expenses, create_expense, get_all_categories, initialize_db,
};

/// A utility for creating a test database for the Spendbook server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// How many days of expenses to generate, ending today.
    #[arg(long, default_value_t = 90)]
    days: u16,
}

const COMMENTS: [&str; 5] = ["", "weekly shop", "birthday", "", "split with flatmate"];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let categories = get_all_categories(&conn)?;
    let today = OffsetDateTime::now_utc().date();

    println!("Creating expenses for the last {} days...", args.days);

    for day in 0..args.days {
        let date = today - Duration::days(day.into());
        let day = usize::from(day);

        // A few expenses a day with a spread of categories and types.
        for slot in 0..(day % 3 + 1) {
            let seed = day * 7 + slot * 13;
            let category = &categories[seed % categories.len()];
            let expense_type = ExpenseType::ALL[seed % ExpenseType::ALL.len()];
            let amount = Amount::new(((seed * 37) % 12_000) as f64 / 100.0 + 1.0)?;

            create_expense(
                Expense::build(amount, date, category.id)
                    .expense_type(expense_type)
                    .comment(COMMENTS[seed % COMMENTS.len()]),
                &conn,
            )?;
        }
    }

    println!("Created {} expenses.", count_expenses(&conn)?);
    println!("Success!");

    Ok(())
}
