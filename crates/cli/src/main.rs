use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use dirichlet::api::{
    build, normalize_generators, parse_complex, parse_generator, reduce_point, CancelToken, Cx,
    DirichletCfg, Mat2c, OrbitPoint, MAX_WORD_LENGTH,
};
use serde_json::json;
use std::path::Path;
use tracing_subscriber::fmt::SubscriberBuilder;

mod artifact;
mod provenance;

use artifact::{write_samples, BuildArtifact};
use provenance::{write_sidecar, Provenance};

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Approximate Dirichlet domains in hyperbolic 3-space")]
struct Cmd {
    /// Optional label propagated to outputs and logs
    #[arg(long)]
    tag: Option<String>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Args)]
struct GenArgs {
    /// Generator `a,b,c,d` (decimal, fraction or complex entries, e.g. `1,1/2+i,0,1`); repeatable
    #[arg(long = "gen", required = true)]
    gens: Vec<String>,
}

#[derive(Args)]
struct CfgArgs {
    #[arg(
        long,
        default_value_t = 3,
        help = format!("Maximum word length (at most {MAX_WORD_LENGTH})")
    )]
    max_len: usize,
    /// Target number of boundary samples
    #[arg(long, default_value_t = 2000)]
    samples: usize,
    /// Accept samples with min |s| below this value
    #[arg(long, default_value_t = 0.02)]
    boundary_tol: f64,
    /// Margin added around the orbit points
    #[arg(long, default_value_t = 1.0)]
    margin: f64,
    /// Determinant / denominator epsilon
    #[arg(long, default_value_t = 1e-12)]
    eps: f64,
    /// Decimal places of the canonical key
    #[arg(long, default_value_t = 6)]
    key_decimals: u32,
    /// |alpha| cutoff between hemisphere and plane bisectors
    #[arg(long, default_value_t = 1e-9)]
    plane_eps: f64,
    /// |alpha| below this (and above the plane cutoff) is logged as borderline
    #[arg(long, default_value_t = 1e-6)]
    borderline_alpha: f64,
    /// Slack on `s <= 0` when testing half-space membership
    #[arg(long, default_value_t = 1e-9)]
    feasibility_eps: f64,
    /// Lowest sampled height t
    #[arg(long, default_value_t = 1e-3)]
    height_floor: f64,
    /// Sampler draws per requested sample
    #[arg(long, default_value_t = 30)]
    iteration_factor: usize,
    /// Sampler seed
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

impl CfgArgs {
    fn to_cfg(&self) -> DirichletCfg {
        DirichletCfg {
            max_word_length: self.max_len,
            sample_count: self.samples,
            boundary_tolerance: self.boundary_tol,
            bounding_margin: self.margin,
            numeric_eps: self.eps,
            key_decimals: self.key_decimals,
            plane_eps: self.plane_eps,
            borderline_alpha: self.borderline_alpha,
            feasibility_eps: self.feasibility_eps,
            height_floor: self.height_floor,
            iteration_factor: self.iteration_factor,
            seed: self.seed,
        }
    }
}

#[derive(Subcommand)]
enum Action {
    /// Build the domain and write the JSON artifact (plus optional samples table)
    Build {
        #[command(flatten)]
        gens: GenArgs,
        #[command(flatten)]
        cfg: CfgArgs,
        /// JSON artifact path
        #[arg(long)]
        out: String,
        /// Samples table path (`.csv` or `.parquet`)
        #[arg(long)]
        samples_out: Option<String>,
    },
    /// Move a point `x,y,t` towards the basepoint using the generators
    Reduce {
        #[command(flatten)]
        gens: GenArgs,
        #[arg(long)]
        point: String,
        #[arg(long, default_value_t = 1000)]
        max_iter: usize,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Build {
            gens,
            cfg,
            out,
            samples_out,
        } => run_build(&gens, &cfg, &out, samples_out.as_deref(), cmd.tag),
        Action::Reduce {
            gens,
            point,
            max_iter,
        } => run_reduce(&gens, &point, max_iter),
        Action::Report => report(cmd.tag),
    }
}

fn parse_gens(args: &GenArgs) -> Result<Vec<Mat2c>> {
    args.gens
        .iter()
        .map(|s| parse_generator(s).with_context(|| format!("generator {s:?}")))
        .collect()
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    Ok(())
}

fn run_build(
    gen_args: &GenArgs,
    cfg_args: &CfgArgs,
    out: &str,
    samples_out: Option<&str>,
    tag: Option<String>,
) -> Result<()> {
    let gens = parse_gens(gen_args)?;
    let cfg = cfg_args.to_cfg();
    cfg.validate().context("configuration")?;
    tracing::info!(
        generators = gens.len(),
        max_len = cfg.max_word_length,
        samples = cfg.sample_count,
        seed = cfg.seed,
        tag = ?tag,
        "build"
    );
    let built = build(&gens, &cfg, &CancelToken::new()).context("dirichlet build")?;
    let params = json!({
        "generators": gen_args.gens,
        "max_word_length": cfg.max_word_length,
        "sample_count": cfg.sample_count,
        "boundary_tolerance": cfg.boundary_tolerance,
        "bounding_margin": cfg.bounding_margin,
        "numeric_eps": cfg.numeric_eps,
        "key_decimals": cfg.key_decimals,
        "plane_eps": cfg.plane_eps,
        "borderline_alpha": cfg.borderline_alpha,
        "feasibility_eps": cfg.feasibility_eps,
        "height_floor": cfg.height_floor,
        "iteration_factor": cfg.iteration_factor,
        "seed": cfg.seed,
    });

    let out_path = Path::new(out);
    ensure_parent(out_path)?;
    let doc = BuildArtifact::from_build(&built);
    std::fs::write(out_path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {out}"))?;
    write_sidecar(out_path, params.clone(), tag.clone())?;

    if let Some(samples_out) = samples_out {
        let path = Path::new(samples_out);
        ensure_parent(path)?;
        write_samples(path, &built.samples)?;
        write_sidecar(path, params, tag)?;
    }
    println!("{}", built.log);
    Ok(())
}

fn parse_point(s: &str) -> Result<OrbitPoint> {
    let parts: Vec<&str> = s.split(',').collect();
    let [x, y, t] = parts.as_slice() else {
        bail!("point must be `x,y,t`, got {s:?}");
    };
    let re = |v: &str| -> Result<f64> {
        let z = parse_complex(v).with_context(|| format!("coordinate {v:?}"))?;
        if z.im != 0.0 {
            bail!("coordinate {v:?} must be real");
        }
        Ok(z.re)
    };
    let p = OrbitPoint::new(Cx::new(re(*x)?, re(*y)?), re(*t)?);
    if p.t <= 0.0 {
        bail!("height t must be > 0, got {}", p.t);
    }
    Ok(p)
}

fn run_reduce(gen_args: &GenArgs, point: &str, max_iter: usize) -> Result<()> {
    let gens = parse_gens(gen_args)?;
    let start = parse_point(point)?;
    let eps = DirichletCfg::default().numeric_eps;
    let gens = normalize_generators(&gens, eps)?;
    let r = reduce_point(&gens, start, max_iter, eps)?;
    let word: String = r.applied.iter().rev().map(|s| s.to_string()).collect();
    let obj = json!({
        "point": [r.point.w.re, r.point.w.im, r.point.t],
        "distance": r.distance,
        "applied": word,
        "steps": r.applied.len(),
        "converged": r.converged,
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

fn report(tag: Option<String>) -> Result<()> {
    let record = Provenance::new(json!({}), tag, Vec::new());
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_parsing() {
        let p = parse_point("0.5,-1/2,2").unwrap();
        assert!((p.w.re - 0.5).abs() < 1e-12 && (p.w.im + 0.5).abs() < 1e-12);
        assert!((p.t - 2.0).abs() < 1e-12);
        assert!(parse_point("1,2").is_err());
        assert!(parse_point("0,0,-1").is_err());
        assert!(parse_point("i,0,1").is_err());
    }

    fn parse_build(extra: &[&str]) -> CfgArgs {
        let mut argv = vec!["cli", "build", "--gen", "1,1,0,1", "--out", "x.json"];
        argv.extend_from_slice(extra);
        match Cmd::try_parse_from(argv).unwrap().action {
            Action::Build { cfg, .. } => cfg,
            _ => panic!("expected build"),
        }
    }

    #[test]
    fn cli_flags_map_onto_cfg() {
        let c = parse_build(&[
            "--max-len", "2", "--samples", "10", "--boundary-tol", "0.05", "--margin", "0.5",
            "--eps", "1e-10", "--key-decimals", "8", "--plane-eps", "1e-8",
            "--borderline-alpha", "1e-4", "--feasibility-eps", "1e-7", "--height-floor", "0.1",
            "--iteration-factor", "12", "--seed", "9",
        ])
        .to_cfg();
        assert_eq!(c.max_word_length, 2);
        assert_eq!(c.sample_count, 10);
        assert_eq!(c.boundary_tolerance, 0.05);
        assert_eq!(c.bounding_margin, 0.5);
        assert_eq!(c.numeric_eps, 1e-10);
        assert_eq!(c.key_decimals, 8);
        assert_eq!(c.plane_eps, 1e-8);
        assert_eq!(c.borderline_alpha, 1e-4);
        assert_eq!(c.feasibility_eps, 1e-7);
        assert_eq!(c.height_floor, 0.1);
        assert_eq!(c.iteration_factor, 12);
        assert_eq!(c.seed, 9);
        c.validate().unwrap();
    }

    #[test]
    fn cli_defaults_match_library_defaults() {
        let c = parse_build(&[]).to_cfg();
        let d = DirichletCfg::default();
        assert_eq!(c.max_word_length, d.max_word_length);
        assert_eq!(c.sample_count, d.sample_count);
        assert_eq!(c.borderline_alpha, d.borderline_alpha);
        assert_eq!(c.feasibility_eps, d.feasibility_eps);
        assert_eq!(c.height_floor, d.height_floor);
        assert_eq!(c.iteration_factor, d.iteration_factor);
    }

    #[test]
    fn inconsistent_alpha_cutoffs_are_rejected_not_adjusted() {
        let c = parse_build(&["--plane-eps", "1e-3", "--borderline-alpha", "1e-6"]).to_cfg();
        assert_eq!(c.borderline_alpha, 1e-6);
        assert!(c.validate().is_err());
    }
}
