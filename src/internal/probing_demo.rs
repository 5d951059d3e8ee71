//! Walks a small table through growth, updates, removal and reuse of a tombstone.

use anyhow::Result;
use quadtable::ProbingTable;

fn main() -> Result<()> {
    let mut table = ProbingTable::with_capacity(4)?;

    table.insert("one", 1)?;
    table.insert("two", 2)?;
    table.insert("three", 3)?;
    table.insert("four", 4)?;
    table.insert("four", 7)?;
    // Crosses the threshold of the 8 slot table
    table.insert("five", 5)?;
    table.insert("six", 6)?;
    table.insert("seven", 7)?;
    table.insert("eight", 85)?;
    table.insert("nine", 9)?;

    println!("Size: {}", table.len());
    println!("Capacity: {}", table.capacity());
    println!("Get 'three': {:?}", table.get("three"));
    println!("Get 'two': {:?}", table.get("two"));

    table.remove("two");
    println!("Contains 'two' after removal: {}", table.contains_key("two"));

    table.insert("two", 22)?;
    println!("Get new 'two': {:?}", table.get("two"));
    println!("The table:\n{table}");

    table.remove("eight");
    println!("{table}");
    print!("{}", table.slot_table());

    Ok(())
}
