//! Draw a few conditioned Galton-Watson trees and print their shape

use gwtree::prelude::*;
use gwtree::utils::{init_tracing, timing::Timer};

fn main() -> gwtree::Result<()> {
    init_tracing();

    println!("=== Conditioned Galton-Watson trees ===\n");

    let configs = [
        ("full binary", GeneratorConfig::full_binary_trees(9).with_seed(1)),
        ("plane", GeneratorConfig::plane_trees(8)?.with_seed(2)),
        ("Cayley", GeneratorConfig::cayley_trees(8)?.with_seed(3)),
    ];

    for (name, config) in configs {
        let gw = config.build()?;
        let mut rng = config.rng();

        let report = {
            let _timer = Timer::new(name);
            gw.sample_with_report(&mut rng)?
        };
        let tree = &report.tree;
        let root = tree.root();

        println!("--- {} tree on {} nodes ({} attempts) ---", name, gw.node_count(), report.attempts);
        println!("{:?}", tree);
        println!("height: {}, leaves: {}", tree.height(root), tree.leaf_count());
        println!("child counts: {:?}\n", tree.child_counts());
    }

    // A support of {2} can never give 4 nodes
    let only_two = OffspringTable::from_pairs(&[(2, 1.0)])?;
    let gw = GaltonWatson::new(&only_two, 4)?;
    let mut rng = GeneratorConfig::default().with_seed(0).rng();
    match gw.sample(&mut rng) {
        Err(e) => println!("expected failure: {}", e),
        Ok(tree) => println!("unexpected tree: {:?}", tree),
    }

    Ok(())
}
