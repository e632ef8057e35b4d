//! The `selfquiz init` command.

use std::path::Path;

use anyhow::{Context, Result};

pub fn execute() -> Result<()> {
    if Path::new("selfquiz.toml").exists() {
        println!("selfquiz.toml already exists, skipping.");
    } else {
        std::fs::write("selfquiz.toml", SAMPLE_CONFIG).context("failed to write selfquiz.toml")?;
        println!("Created selfquiz.toml");
    }

    std::fs::create_dir_all("question-banks")?;
    let example_path = Path::new("question-banks/example.toml");
    if example_path.exists() {
        println!("question-banks/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_BANK)
            .context("failed to write question-banks/example.toml")?;
        println!("Created question-banks/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Add your own questions to question-banks/example.toml");
    println!("  2. Run: selfquiz validate --bank question-banks");
    println!("  3. Run: selfquiz practice");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# selfquiz configuration

# Extra question banks, merged with the built-in catalogue.
banks = ["question-banks"]
include_builtin = true

# default_subject = "os"
grading_delay_ms = 1000
show_breakdown = false

[weights]
keyword = 0.7
semantic = 0.2
explanation = 0.07
example = 0.03
"#;

const EXAMPLE_BANK: &str = r#"[bank]
id = "example"
name = "Example Questions"
description = "A starter bank to copy from"

[[questions]]
id = "example-dsa-1"
subject = "dsa"
topic = "Hash Tables"
prompt = "How does a hash table achieve average constant-time lookups?"
ideal_answer = """
A hash table applies a hash function to each key to compute a bucket index in \
an array, so a lookup goes straight to one bucket instead of scanning every \
entry. Collisions, where two keys map to the same bucket, are resolved with \
chaining or open addressing. Keeping the load factor low by resizing the array \
keeps buckets short, which gives constant time on average.
"""
keywords = ["hash function", "bucket", "collision", "load factor"]
marks = 10

[[questions]]
id = "example-os-1"
subject = "os"
topic = "Virtual Memory"
prompt = "What is virtual memory and why is it useful?"
ideal_answer = """
Virtual memory gives each process its own address space that is mapped onto \
physical memory through page tables. Pages that are not in use can live on \
disk, and a page fault loads them back when needed. This isolates processes \
from each other and lets programs use more memory than is physically present.
"""
keywords = ["address space", "page table", "page fault", "physical memory"]
marks = 10
"#;
