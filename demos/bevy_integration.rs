//! Bevy integration example.
//!
//! This example shows how to:
//! - Set up the `FolderTreePlugin` keyed by `Entity`
//! - File spawned entities into folders from a system
//! - Look up an entity's folders through the reverse index

use bevy::prelude::*;
use bevy_folders::bevy::FolderTreePlugin;
use bevy_folders::{FolderTree, NameOrder, ROOT_ID, TreeConfig};

#[derive(Component)]
struct Contact(&'static str);

fn main() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(FolderTreePlugin::<Entity>::new().with_config(TreeConfig {
            name_order: NameOrder::CaseInsensitive,
            open_new_containers: true,
        }))
        .add_systems(Startup, (spawn_contacts, file_contacts).chain())
        .add_systems(Update, print_folders);
    // One frame is enough here.
    app.update();
}

fn spawn_contacts(mut commands: Commands) {
    println!("=== Bevy Integration Example ===\n");
    for name in ["Alice", "Bob", "Carol"] {
        commands.spawn(Contact(name));
    }
}

fn file_contacts(mut tree: ResMut<FolderTree<Entity>>, contacts: Query<(Entity, &Contact)>) {
    let Ok((_, Some(officers))) = tree.find_or_create_chain("Guild/Officers") else {
        return;
    };
    let Ok(Some(friends)) = tree.create_folder(ROOT_ID, "Friends") else {
        return;
    };
    for (entity, contact) in &contacts {
        let folder = if contact.0 == "Bob" { officers } else { friends };
        if let Err(e) = tree.create_leaf(folder, contact.0, entity) {
            println!("could not file {}: {e}", contact.0);
        }
    }
    // Alice is in both folders.
    if let Some((alice, _)) = contacts.iter().find(|(_, c)| c.0 == "Alice") {
        let _ = tree.create_leaf(officers, "alice", alice);
    }
}

fn print_folders(tree: Res<FolderTree<Entity>>, contacts: Query<(Entity, &Contact)>) {
    for id in tree.dfs_order() {
        if let Some(node) = tree.node(id) {
            println!("  {} (open: {})", node.full_path(), node.is_open());
        }
    }
    println!();
    for (entity, contact) in &contacts {
        let paths: Vec<&str> = tree
            .leaves_for(&entity)
            .into_iter()
            .flatten()
            .filter_map(|&leaf| tree.parent_of(leaf).and_then(|f| tree.full_path(f)))
            .collect();
        println!("  {} is filed in {paths:?}", contact.0);
    }
}
