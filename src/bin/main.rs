use std::io::{self, BufRead, Write};

use clap::Parser;
use fixed::types::U51F13;
use tracing_subscriber::EnvFilter;

use register_engine::{Catalog, Register, SalesLedger};

/// A command line register on top of the point of sale core
#[derive(Debug, Parser)]
#[clap(version)]
struct Args {
    /// The path to the product catalog CSV file
    #[clap(long, default_value = "products.csv")]
    catalog: std::path::PathBuf,
    /// The directory daily sales logs and summaries are written to
    #[clap(long, default_value = "sales_data")]
    data_dir: std::path::PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let catalog = Catalog::load(&args.catalog)?;
    let ledger = SalesLedger::new(&args.data_dir)?;
    let mut register = Register::new(catalog, ledger);

    print_products(&register);
    println!("Type `help` for the list of commands.");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));

        match command {
            "" => {}
            "help" => print_help(),
            "list" => print_products(&register),
            "add" => match rest.trim().parse::<u32>() {
                Ok(id) => match register.add_to_cart(id.into()) {
                    Ok(product) => println!("Added {}.", product.name()),
                    Err(err) => println!("{err}"),
                },
                Err(_) => println!("Usage: add <product id>"),
            },
            "remove" => match register.remove_from_cart(rest.trim()) {
                Ok(()) => println!("Removed one {}.", rest.trim()),
                Err(err) => println!("{err}"),
            },
            "cart" => print_cart(&register),
            "checkout" => match rest.trim().parse::<U51F13>() {
                Ok(received) => match register.checkout(received) {
                    Ok(sale) => {
                        if let Some(receipt) = register.last_receipt() {
                            println!("{receipt}");
                        }
                        println!("Change due: ฿{:.2}", sale.change());
                    }
                    Err(err) => println!("{err}"),
                },
                Err(_) => println!("Usage: checkout <received cash amount>"),
            },
            "receipt" => match register.last_receipt() {
                Some(receipt) => println!("{receipt}"),
                None => println!("No sale has been completed yet."),
            },
            "summary" => print_summary(&register),
            "report" => match register.write_daily_summary() {
                Ok(path) => println!("Summary written to {}.", path.display()),
                Err(err) => println!("Failed to write the summary: {err}"),
            },
            "files" => {
                println!("Sales log: {}", register.ledger().sales_log_path().display());
                println!("Summary:   {}", register.ledger().summary_path().display());
            }
            "quit" | "exit" => break,
            _ => println!("Unknown command {command:?}. Type `help` for the list of commands."),
        }
    }

    Ok(())
}

fn print_products(register: &Register) {
    println!("Products:");
    for product in register.catalog().products() {
        println!(
            "  {:>3}  {:<20} ฿{:.2}",
            product.id(),
            product.name(),
            product.price()
        );
    }
}

fn print_cart(register: &Register) {
    if register.cart().is_empty() {
        println!("The cart is empty.");
        return;
    }

    println!("Cart:");
    for line in register.cart().lines() {
        println!(
            "  {:<20} x{:<3} ฿{:.2}",
            line.product().name(),
            line.quantity(),
            line.line_total()
        );
    }
    println!("Subtotal:   ฿{:.2}", register.subtotal());
    println!(
        "Amount due: ฿{:.2} (incl. {}% tax)",
        register.amount_due(),
        register_engine::tax::TAX_RATE_PERCENT
    );
}

fn print_summary(register: &Register) {
    let summary = register.quick_summary();
    println!(
        "Today: {} transactions, ฿{:.2} revenue.",
        summary.transaction_count(),
        summary.total_revenue()
    );
    for (rank, (name, quantity)) in summary.top_sellers().iter().enumerate() {
        println!("  {}. {name} ({quantity})", rank + 1);
    }
}

fn print_help() {
    println!("Commands:");
    println!("  list                 show the product catalog");
    println!("  add <id>             add one unit of a product to the cart");
    println!("  remove <name>        remove one unit of a product from the cart");
    println!("  cart                 show the cart and the amount due");
    println!("  checkout <amount>    complete the sale against the received cash");
    println!("  receipt              reprint the receipt of the last sale");
    println!("  summary              show today's quick sales summary");
    println!("  report               write today's summary report file");
    println!("  files                show where the sales files are written");
    println!("  quit                 exit");
}
