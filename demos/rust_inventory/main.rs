//! Inventory Application Example
//!
//! This example demonstrates:
//! - Addressing records through tenant > resource type > id buckets
//! - Chaining operations through returned sessions
//! - Update and get failures that leave no stale data behind
//! - Batching several writes into one transaction with `execute`

use nutz_core::{ops, CoreError, Outcome, Request, Session, StoreConfig, TxMode};
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

const TENANTS: &str = "tenants";

fn report(label: &str, session: &Session) {
    match (session.last_error(), session.payload()) {
        (Some(err), _) if err.is_not_found() => println!("[--] {label}: {err}"),
        (Some(err), _) => println!("[ERR] {label}: {err}"),
        (None, Some(bytes)) => println!("[OK] {label}: {}", String::from_utf8_lossy(bytes)),
        (None, None) => println!("[OK] {label}"),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Inventory Application Example");
    println!("=============================\n");

    let dir = TempDir::new()?;
    let config = StoreConfig::new(dir.path().join("inventory.db")).file_mode(0o600);
    let session = Session::new(config);
    println!("[OK] Backing file: {}", session.config().path().display());

    // Nested buckets are created on demand.
    println!("\n[+] Creating products...");
    let session = session.create(TENANTS, "p-1", br#"{"name":"bolt","qty":40}"#, &["acme", "products"]);
    report("acme/products/p-1", &session);
    let session = session.create(TENANTS, "p-2", br#"{"name":"nut","qty":75}"#, &["acme", "products"]);
    report("acme/products/p-2", &session);
    let session = session.create(TENANTS, "p-1", br#"{"name":"gear","qty":3}"#, &["globex", "products"]);
    report("globex/products/p-1", &session);
    let session = session.create(TENANTS, "w-1", br#"{"city":"Oslo"}"#, &["acme", "warehouses"]);
    report("acme/warehouses/w-1", &session);

    // Reads require the exact chain.
    println!("\n[?] Reading back...");
    report("get acme/products/p-2", &session.get(TENANTS, "p-2", &["acme", "products"]));
    report("get products/acme/p-2", &session.get(TENANTS, "p-2", &["products", "acme"]));
    report("get acme/products/p-9", &session.get(TENANTS, "p-9", &["acme", "products"]));

    // Updates never create.
    println!("\n[~] Updating...");
    report(
        "update acme/products/p-1",
        &session.update(TENANTS, "p-1", br#"{"name":"bolt","qty":39}"#, &["acme", "products"]),
    );
    report(
        "update acme/products/p-3",
        &session.update(TENANTS, "p-3", br#"{"name":"washer","qty":1}"#, &["acme", "products"]),
    );

    // One transaction for a whole delivery.
    println!("\n[+] Receiving a delivery in one transaction...");
    let delivery = [("p-3", "washer"), ("p-4", "spring"), ("p-5", "rivet")];
    let request = Request::new(TENANTS).path(&["acme", "products"]);
    let received = session.execute(TxMode::Write, request, |txn, request, _| {
        let path = request.namespace()?;
        for (id, name) in delivery {
            let record = format!(r#"{{"name":"{name}","qty":10}}"#);
            ops::create(txn, &path, id, record.as_bytes())?;
        }
        Ok(Outcome::empty())
    });
    report("delivery", &received);

    println!("\n[=] acme products:");
    let products = received
        .enumerate(TENANTS, &["acme", "products"])
        .into_enumerated()
        .unwrap_or_default();
    for (id, record) in &products {
        println!("    {id}: {}", String::from_utf8_lossy(record));
    }

    // The tenant bucket holds only nested buckets, no direct entries.
    let tenant = received.enumerate(TENANTS, &["acme"]);
    println!(
        "    (acme holds {} direct entries)",
        tenant.enumerated().map_or(0, |entries| entries.len())
    );

    println!("\n[-] Deleting...");
    report("delete acme/warehouses/w-1", &tenant.delete(TENANTS, "w-1", &["acme", "warehouses"]));
    report("delete again", &tenant.delete(TENANTS, "w-1", &["acme", "warehouses"]));
    report("delete in missing bucket", &tenant.delete(TENANTS, "w-1", &["initech", "warehouses"]));

    let last = tenant.get(TENANTS, "w-1", &["acme", "warehouses"]);
    if let Some(CoreError::KeyNotFound { key }) = last.last_error() {
        println!("[OK] {key} is gone");
    }

    session.delete_backing_store()?;
    println!("\n[OK] Backing file removed");

    Ok(())
}
