//! Dirichlet domain of PSL(2, Z[i]) generators, printed as a face list.
//!
//! Usage:
//!   cargo run -p dirichlet --example modular_domain -- [max_len]
//!
//! Prints every face (hemisphere or plane) together with the word that produced it,
//! then the build log. Translations give planes; the inversion fixes `j`, so it shows
//! up in the log as a skipped bisector while its products with translations give hemispheres.

use dirichlet::prelude::*;

fn main() {
    let max_len = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(3usize);
    let gens = ["1,1,0,1", "1,i,0,1", "0,-1,1,0"]
        .iter()
        .map(|s| parse_generator(s).expect("generator"))
        .collect::<Vec<_>>();
    let cfg = DirichletCfg {
        max_word_length: max_len,
        sample_count: 500,
        ..DirichletCfg::default()
    };
    let built = build(&gens, &cfg, &CancelToken::new()).expect("build");
    for face in &built.faces {
        let word = built.enumeration.elements[face.element].word.to_string();
        match face.bisector.shape {
            BisectorShape::Hemisphere { center, radius } => println!(
                "{word:>8}  hemisphere center=({:+.4}, {:+.4}) r={:.4}",
                center.re, center.im, radius
            ),
            BisectorShape::HalfPlane { normal, offset } => println!(
                "{word:>8}  plane      normal=({:+.4}, {:+.4}) offset={:.4}",
                normal.re, normal.im, offset
            ),
        }
    }
    println!("{}", built.log);
}
