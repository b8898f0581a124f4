//! Nested folders demo.
//!
//! Reads commands from stdin and redraws the tree after every change:
//!
//! ```text
//! add root          add a folder under the root
//! add root/f1       add a folder under f1
//! remove root/f1    remove f1 and everything below it
//! quit
//! ```
//!
//! Run with `RUST_LOG=spark_folders=debug` to watch folders come and go.

use std::io::{self, BufRead, Write};
use std::rc::Rc;

use spark_folders::folder::view::{ADD, REMOVE};
use spark_folders::renderer::draw;
use spark_folders::{FolderProps, InteractionHub, Scope, SeededColors, Services, mount};
use spark_signals::effect;
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let hub = Rc::new(InteractionHub::new());
    let services = Services::new(hub.clone())
        .with_colors(SeededColors::new(rand_seed()))
        .into_shared();
    let handle = mount(&services, FolderProps::root("root"))?;

    let tree = handle.tree_signal();
    let stop_redraw = effect(move || {
        let Some(tree) = tree.get() else { return };
        let mut out = io::stdout();
        if let Err(err) = draw(&mut out, &tree) {
            warn!(%err, "redraw failed");
        }
        let _ = writeln!(out);
        let _ = write!(out, "> ");
        let _ = out.flush();
    });

    for line in io::stdin().lock().lines() {
        let line = line?;
        let mut words = line.split_whitespace();
        let (command, target) = (words.next(), words.next());

        match (command, target.and_then(Scope::parse)) {
            (Some("quit"), _) => break,
            (Some("add"), Some(scope)) => report(hub.click(&scope, ADD), &scope),
            (Some("remove"), Some(scope)) => report(hub.click(&scope, REMOVE), &scope),
            _ => eprintln!("usage: add <scope> | remove <scope> | quit"),
        }
    }

    stop_redraw();
    handle.unmount();
    Ok(())
}

/// Fresh colors on every run.
fn rand_seed() -> u64 {
    rand::random()
}

fn report(reached: usize, scope: &Scope) {
    if reached == 0 {
        eprintln!("no folder at {scope}");
    }
}
