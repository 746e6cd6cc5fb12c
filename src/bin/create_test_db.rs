use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use buddy::{
    DEFAULT_HASH_COST, NewUser, create_user, initialize_db,
    seed::{
        AccountName, CategoryName, Transaction, convert_amount_to_miliunits, create_account,
        create_category, create_transaction,
    },
};

/// A utility for creating a test database for the Buddy web server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// (days ago, amount, account, category, payee)
const SAMPLE_TRANSACTIONS: [(i64, &str, &str, Option<&str>, &str); 10] = [
    (0, "-4.50", "Cash", Some("Eating Out"), "Corner Cafe"),
    (1, "-82.13", "Checking", Some("Groceries"), "Supermarket"),
    (2, "-15.99", "Credit Card", Some("Entertainment"), "Streaming Service"),
    (3, "2500.00", "Checking", Some("Salary"), "Employer"),
    (5, "-450.00", "Checking", Some("Rent"), "Landlord"),
    (7, "-23.40", "Credit Card", Some("Eating Out"), "Pizza Place"),
    (9, "-60.00", "Cash", None, "Farmers Market"),
    (12, "-120.75", "Credit Card", Some("Groceries"), "Supermarket"),
    (17, "-450.00", "Checking", Some("Rent"), "Landlord"),
    (31, "2500.00", "Checking", Some("Salary"), "Employer"),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let connection = Connection::open(output_path)?;

    initialize_db(&connection)?;

    println!("Creating test user...");

    let user = create_user(
        NewUser::with_any_password("test", "test", DEFAULT_HASH_COST)?,
        &connection,
    )?;

    println!("Creating accounts and categories...");

    let accounts = ["Cash", "Checking", "Credit Card"]
        .into_iter()
        .map(|name| create_account(AccountName::new(name)?, None, user.id, &connection))
        .collect::<Result<Vec<_>, _>>()?;
    let categories = ["Groceries", "Rent", "Salary", "Eating Out", "Entertainment"]
        .into_iter()
        .map(|name| create_category(CategoryName::new(name)?, None, user.id, &connection))
        .collect::<Result<Vec<_>, _>>()?;

    println!("Creating transactions...");

    let today = OffsetDateTime::now_utc().date();
    for (days_ago, amount, account_name, category_name, payee) in SAMPLE_TRANSACTIONS {
        let account = accounts
            .iter()
            .find(|account| account.name.as_ref() == account_name)
            .ok_or_else(|| format!("no sample account named {account_name}"))?;
        let category_id = category_name.and_then(|category_name| {
            categories
                .iter()
                .find(|category| category.name.as_ref() == category_name)
                .map(|category| category.id.clone())
        });

        create_transaction(
            Transaction::build(
                convert_amount_to_miliunits(amount)?,
                &account.id,
                today - Duration::days(days_ago),
                payee,
            )
            .category_id(category_id),
            user.id,
            &connection,
        )?;
    }

    println!("Success! Log in with username 'test' and password 'test'.");

    Ok(())
}
