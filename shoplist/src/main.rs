//! Command-line walkthrough of the shopping-list store.
//!
//! Stands in for the UI: validates input, dispatches actions, and prints the
//! lists after each step.
//!
//! Set `SHOPLIST_MONOTONIC_IDS=1` for strictly increasing ids and `RUST_LOG`
//! (e.g. `RUST_LOG=shoplist=trace,shoplist_runtime=debug`) for logs.

use shoplist::validation::{validate_name, validate_quantity};
use shoplist::{actions, shopping_store, AppState, ItemDraft, ItemPatch, ShoppingEnvironment};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
    shoplist_runtime::metrics::register_metrics();

    println!("=== Shopping Lists ===\n");

    let monotonic = std::env::var("SHOPLIST_MONOTONIC_IDS").is_ok_and(|value| value == "1");
    let env = if monotonic {
        tracing::info!("Using monotonic ids");
        ShoppingEnvironment::monotonic()
    } else {
        ShoppingEnvironment::production()
    };

    let store = shopping_store(env);
    let renders = Arc::new(AtomicUsize::new(0));
    let render_count = Arc::clone(&renders);
    store.subscribe(move |_: &AppState| {
        render_count.fetch_add(1, Ordering::Relaxed);
    });

    let ids = store.environment().ids();

    // Create a list
    let create = actions::add_shopping_list(ids, validate_name(" Groceries ")?);
    let groceries = create.list_id();
    store.send(create)?;

    // Add items
    let mut item_ids = Vec::new();
    for (name, quantity) in [("Milk", "2"), ("Bread", "1"), ("Apples", "6")] {
        let draft = ItemDraft::validated(name, quantity)?;
        let action = actions::add_item(ids, groceries, draft);
        if let shoplist::ShoppingListAction::AddItem { item_id, .. } = &action {
            item_ids.push(*item_id);
        }
        store.send(action)?;
        // Timestamp ids need distinct milliseconds.
        std::thread::sleep(std::time::Duration::from_millis(2));
    }
    print_lists(&store.snapshot());

    // Blank input never reaches the store
    if let Err(error) = validate_quantity("   ") {
        println!("\nRejected quantity: {error}");
    }

    println!("\nBuying milk, changing apples to 4...");
    if let [milk, _, apples] = item_ids[..] {
        store.send(actions::toggle_item_purchased(groceries, milk))?;
        store.send(actions::edit_item(
            groceries,
            apples,
            ItemPatch::new().quantity(validate_quantity("4")?),
        ))?;
    }
    print_lists(&store.snapshot());

    println!("\nRenaming list...");
    store.send(actions::edit_shopping_list_name(
        groceries,
        validate_name("Weekend shop")?,
    ))?;
    print_lists(&store.snapshot());

    println!("\nFinal state as JSON:");
    println!("{}", serde_json::to_string_pretty(&store.snapshot())?);

    store.send(actions::delete_shopping_list(groceries))?;
    println!(
        "\nDeleted list; {} lists left after {} updates",
        store.state(AppState::list_count),
        renders.load(Ordering::Relaxed)
    );

    store.shutdown();
    println!("\n=== Demo Complete ===");
    Ok(())
}

fn print_lists(state: &AppState) {
    for list in state.lists() {
        println!(
            "{} ({}/{} bought)",
            list.name,
            list.purchased_count(),
            list.item_count()
        );
        for item in list.items() {
            let status = if item.purchased { "✓" } else { " " };
            println!("  [{status}] {} x{}", item.name, item.quantity);
        }
    }
}
