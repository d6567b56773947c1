//! # Seed Data Generator
//!
//! Populates the store with demo master data and a full document chain
//! for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default development database
//! cargo run -p datatec-store --bin seed
//!
//! # Specify database path
//! cargo run -p datatec-store --bin seed -- --db ./data/datatec.db
//! ```
//!
//! ## Generated Data
//! - A handful of customers, vendors, and inventory items
//! - One quotation converted through the whole chain:
//!   quotation → sales order → purchase order + invoice + delivery order

use std::env;

use datatec_core::{Customer, ItemRecord, LineItem, SalesOrderStatus};
use datatec_store::{Store, StoreConfig};

const CUSTOMERS: &[(&str, &str, &str)] = &[
    (
        "Apex Engineering Sdn Bhd",
        "Mr. Tan",
        "purchasing@apexeng.example",
    ),
    ("Borneo Retail Sdn Bhd", "Ms. Lim", "lim@borneoretail.example"),
    ("Cahaya Trading", "Mr. Raj", "raj@cahaya.example"),
];

const VENDORS: &[&str] = &["TechSource Distribution", "Prime Components", "MegaParts"];

const ITEMS: &[(&str, &str, f64, f64, &str)] = &[
    ("NB-1401", "14\" business notebook", 2450.0, 6.0, "TechSource Distribution"),
    ("MON-2701", "27\" IPS monitor", 780.0, 6.0, "TechSource Distribution"),
    ("DOCK-USB4", "USB4 docking station", 520.0, 6.0, "Prime Components"),
    ("KB-MX101", "Mechanical keyboard", 310.0, 6.0, "Prime Components"),
    ("CAB-HDMI2", "HDMI 2.1 cable 2m", 35.0, 6.0, "MegaParts"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./datatec_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Datatec ERP Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./datatec_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Datatec ERP Seed Data Generator");
    println!("==================================");
    println!("Database: {}", db_path);
    println!();

    let store = Store::new(StoreConfig::new(&db_path)).await?;
    println!("✓ Connected to store");
    println!("✓ Migrations applied");

    let docs = store.documents();

    // Check existing data
    let existing = docs.quotations().await?;
    if !existing.is_empty() {
        println!("⚠ Store already has {} quotations", existing.len());
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Masters
    println!();
    println!("Seeding master data...");

    let masters = store.masters();
    for (name, attention, email) in CUSTOMERS {
        masters
            .upsert_customer(&Customer {
                name: (*name).into(),
                attention: (*attention).into(),
                email: (*email).into(),
                tax_scheme: 6.0,
                payment_terms: "30 days".into(),
                ..Default::default()
            })
            .await?;
    }
    for vendor in VENDORS {
        masters.upsert_vendor(vendor).await?;
    }
    for (sku, description, price, tax, vendor) in ITEMS {
        masters
            .save_item(&ItemRecord {
                sku: (*sku).into(),
                description: (*description).into(),
                price: *price,
                tax: *tax,
                vendor: (*vendor).into(),
                ..Default::default()
            })
            .await?;
    }
    println!(
        "  {} customers, {} vendors, {} items",
        CUSTOMERS.len(),
        VENDORS.len(),
        ITEMS.len()
    );

    // Document chain
    println!();
    println!("Seeding document chain...");

    let mut quotation = docs.new_quotation().await?;
    quotation.customer = "Apex Engineering Sdn Bhd".into();
    quotation.attention = "Mr. Tan".into();
    quotation.email = "purchasing@apexeng.example".into();
    quotation.billing = "12 Jalan Industri, 47100 Puchong".into();
    quotation.shipping = "12 Jalan Industri, 47100 Puchong".into();
    quotation.tax_scheme = 6.0;
    quotation.items = vec![
        demo_line("NB-1401", 4.0, 2450.0, "TechSource Distribution"),
        demo_line("MON-2701", 4.0, 780.0, "TechSource Distribution"),
        demo_line("DOCK-USB4", 4.0, 520.0, "Prime Components"),
    ];
    let quotation = docs.save_quotation(quotation).await?;
    println!("  Quotation      {}", quotation.number);

    let mut so = docs.convert_quotation_to_sales_order(&quotation.id).await?;
    so.status = SalesOrderStatus::Completed;
    so.shipping_total = 120.0;
    let so = docs.save_sales_order(so).await?;
    println!("  Sales order    {}  ({:.2})", so.number, so.grand_total);

    let po = docs
        .convert_sales_order_to_purchase_order(&so.id, Some("TechSource Distribution"))
        .await?;
    let po = docs.save_purchase_order(po).await?;
    println!("  Purchase order {}  ({} lines)", po.number, po.items.len());

    let invoice = docs.convert_sales_order_to_invoice(&so.id).await?;
    let invoice = docs.save_invoice(invoice.document).await?;
    println!("  Invoice        {}  (due {})", invoice.number, invoice.due_date);

    let delivery = docs.convert_sales_order_to_delivery_order(&so.id).await?;
    let delivery = docs.save_delivery_order(delivery.document).await?;
    println!("  Delivery order {}", delivery.number);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds a demo document line from the item table.
fn demo_line(sku: &str, qty: f64, price: f64, vendor: &str) -> LineItem {
    let description = ITEMS
        .iter()
        .find(|(s, ..)| *s == sku)
        .map(|(_, d, ..)| (*d).to_string())
        .unwrap_or_default();
    LineItem {
        sku: sku.into(),
        description,
        qty,
        price,
        tax: 6.0,
        vendor: vendor.into(),
    }
}
