//! Persisting the folder skeleton and reloading it against live items.
//!
//! Leaves point at runtime data, so only the folders are saved. On reload
//! the tree is rebuilt for whatever items exist now; items the blob does
//! not know get a root-level folder of their own.

use bevy_folders::*;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct Contact {
    uid: u64,
    name: &'static str,
}

fn label(contact: &Contact) -> String {
    format!("uid-{}", contact.uid)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Reload Hierarchy Example ===\n");

    let alice = Contact { uid: 1, name: "Alice" };
    let bob = Contact { uid: 2, name: "Bob" };
    let carol = Contact { uid: 3, name: "Carol" };

    // 1. Build and save
    let mut tree = FolderTree::new();
    let (_, officers) = tree.find_or_create_chain("Guild//Raid/Officers")?;
    let officers = officers.ok_or("Officers not created")?;
    let friends = tree.create_folder(ROOT_ID, "Friends")?.ok_or("Friends exists")?;
    tree.create_leaf(officers, alice.name, alice.clone())?;
    tree.create_leaf(friends, bob.name, bob.clone())?;
    if let Some(guild) = tree.find("Guild") {
        tree.set_open_state(guild, true)?;
    }

    let json = tree.serialize(label).to_json()?;
    println!("Saved blob:\n{json}\n");

    // 2. Reload: Bob is gone, Carol is new
    let blob = HierarchyBlob::from_json(&json)?;
    let mut reloaded = FolderTree::new();
    let restored = reloaded.deserialize(&blob, [alice.clone(), carol.clone()], label);
    println!("Changed since save: {}", restored.changed);

    for contact in [&alice, &carol] {
        let Some(folder) = restored.placement_of(contact) else {
            continue;
        };
        reloaded.create_leaf(folder, contact.name, contact.clone())?;
        println!(
            "  {} -> {}",
            contact.name,
            reloaded.full_path(folder).unwrap_or("?")
        );
    }
    println!();

    // 3. The healed skeleton
    println!("Reloaded blob:\n{}", reloaded.serialize(label).to_json()?);
    Ok(())
}
