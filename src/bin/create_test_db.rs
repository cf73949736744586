use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use cafe_rs::{add_cart_item, checkout, get_all_products, get_all_users, initialize_db};

/// A utility for creating a test database for the cafe web server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
///
/// Every seeded user gets two past purchases and one item left in their cart.
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
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let products = get_all_products(&conn)?;

    for user in get_all_users(&conn)? {
        println!("Creating purchases for {}...", user.username);

        for (quantity, product) in (1..).zip(products.iter().take(2)) {
            add_cart_item(user.id, product.id, quantity, &conn)?;
        }
        checkout(user.id, &conn)?;

        for product in products.iter().skip(2) {
            add_cart_item(user.id, product.id, 1, &conn)?;
        }
        checkout(user.id, &conn)?;

        if let Some(product) = products.first() {
            add_cart_item(user.id, product.id, 1, &conn)?;
        }
    }

    println!("Success!");

    Ok(())
}
