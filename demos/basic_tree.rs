//! Building and editing a folder tree.
//!
//! This example shows how to:
//! - Create groups, folders and leaves
//! - Resolve nodes by path
//! - Rename, move and merge nodes and read the outcomes

use bevy_folders::*;

fn print_tree(tree: &FolderTree<&str>) {
    for id in tree.dfs_order() {
        let Some(node) = tree.node(id) else { continue };
        let marker = match node.kind() {
            Kind::Group => "G",
            Kind::Folder => "F",
            Kind::Leaf => "-",
        };
        println!("  [{marker}] {}", node.full_path());
    }
    println!();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Basic Tree Example ===\n");

    // 1. Build a small hierarchy
    let mut tree = FolderTree::new();
    let guild = tree.create_group(ROOT_ID, "Guild")?.ok_or("Guild exists")?;
    let officers = tree.create_folder(guild, "Officers")?.ok_or("Officers exists")?;
    let (outcome, healers) = tree.find_or_create_chain("Guild//Raid/Healers")?;
    let healers = healers.ok_or("Healers not created")?;
    println!("Chain Guild//Raid/Healers -> {outcome:?}\n");
    let friends = tree.create_folder(ROOT_ID, "Friends")?.ok_or("Friends exists")?;

    tree.create_leaf(officers, "Alice", "alice")?;
    tree.create_leaf(friends, "Alice", "alice")?;
    tree.create_leaf(healers, "Bob", "bob")?;

    println!("Initial tree:");
    print_tree(&tree);

    // 2. Path lookups
    println!("Lookups:");
    println!("  find(\"Guild//Raid/Healers\") = {:?}", tree.find("Guild//Raid/Healers"));
    println!("  find(\"Guild/Raid\")          = {:?}", tree.find("Guild/Raid"));
    println!("  find_leaf(\"Friends/Alice\")  = {:?}", tree.find_leaf("Friends/Alice"));
    println!("  'alice' appears in {} folders", tree.leaves_for(&"alice").map_or(0, |s| s.len()));
    println!();

    // 3. Collisions are outcomes, not errors
    println!("Outcomes:");
    println!("  create \"Officers\" again -> {:?}", tree.create_folder(guild, "Officers")?);
    println!("  rename Friends -> Buddies -> {:?}", tree.rename(friends, "Buddies")?);
    println!("  rename Buddies -> Buddies -> {:?}", tree.rename(friends, "Buddies")?);
    let raid = tree.find("Guild//Raid").ok_or("Raid missing")?;
    println!("  move Guild under Raid     -> {:?}", tree.move_node(guild, raid, None)?);
    println!("  merge Buddies into Officers -> {:?}", tree.merge(friends, officers)?);
    println!();

    println!("Final tree:");
    print_tree(&tree);

    // 4. Programmer errors are errors
    println!("Errors:");
    if let Err(e) = tree.create_folder(officers, "Nested") {
        println!("  {e}");
    }
    if let Err(e) = tree.rename(ROOT_ID, "Root") {
        println!("  {e}");
    }
    if let Err(e) = tree.find_or_create_chain("Guild/Officers//Deep") {
        println!("  {e}");
    }

    Ok(())
}
