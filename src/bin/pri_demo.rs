use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use colored::Colorize;
use structopt::StructOpt;

use pri_algorithm::{CDIF, PRITransform, PulseCorrelation, PulseSearcher, SDIF};

#[derive(Debug)]
enum Algo {
    Cdif,
    Sdif,
    PriTransform,
    Correlation,
    Search,
}

impl FromStr for Algo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cdif" => Ok(Algo::Cdif),
            "sdif" => Ok(Algo::Sdif),
            "pri-transform" => Ok(Algo::PriTransform),
            "correlation" => Ok(Algo::Correlation),
            "search" => Ok(Algo::Search),
            other => Err(format!("unknown algorithm `{other}`")),
        }
    }
}

impl fmt::Display for Algo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algo::Cdif => "cdif",
            Algo::Sdif => "sdif",
            Algo::PriTransform => "pri-transform",
            Algo::Correlation => "correlation",
            Algo::Search => "search",
        };
        write!(f, "{name}")
    }
}

#[derive(StructOpt)]
#[structopt(name = "pri_demo", about = "PRI estimation/extraction demo")]
struct Options {
    #[structopt(long, short = "f")]
    file: PathBuf,
    #[structopt(long, short = "a", default_value = "cdif")]
    algo: Algo,
    #[structopt(long, default_value = "0.5")]
    bin_width: f64,
    #[structopt(long, default_value = "5")]
    max_rank: u32,
    #[structopt(long, default_value = "0.05")]
    k: f64,
    #[structopt(long, default_value = "0.3")]
    x: f64,
    #[structopt(long, default_value = "0.5")]
    alpha: f64,
    #[structopt(long, default_value = "0.15")]
    beta: f64,
    #[structopt(long, default_value = "3.0")]
    gamma: f64,
    #[structopt(long, default_value = "1.0")]
    range_lo: f64,
    #[structopt(long, default_value = "10.0")]
    range_hi: f64,
    #[structopt(long, default_value = "2")]
    merge_num: usize,
    #[structopt(long, default_value = "3")]
    min_chain: usize,
    #[structopt(long, default_value = "3")]
    thr: usize,
    #[structopt(long, default_value = "1.0")]
    toler: f64,
    #[structopt(long, default_value = "0.1")]
    allow_miss_rate: f64,
    #[structopt(long)]
    pri: Option<f64>,
}

fn pretty_count(n: usize) -> String {
    format!("{n} pulses")
}

fn load_toas(path: &PathBuf) -> std::io::Result<Vec<f64>> {
    let text = std::fs::read_to_string(path)?;
    let toas: Vec<f64> = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<f64>().ok())
        .collect();
    Ok(toas)
}

fn main() -> std::io::Result<()> {
    env_logger::init();
    let opt = Options::from_args();

    let toas = load_toas(&opt.file)?;
    println!(
        "{}: {} -- {}",
        opt.file.to_str().unwrap_or("<file>").green(),
        pretty_count(toas.len()).bold(),
        format!("algo={}", opt.algo).bold(),
    );

    match opt.algo {
        Algo::Cdif => {
            let cdif = CDIF::new(opt.k);
            match cdif.run(&toas, opt.max_rank, opt.bin_width) {
                Some(pri) => println!("{} {}", "PRI:".green(), pri),
                None => println!("{}", "no PRI found".red()),
            }
        }
        Algo::Sdif => {
            let sdif = SDIF::new(opt.x, opt.k);
            match sdif.run(&toas, opt.max_rank, opt.bin_width) {
                Some(pri) => println!("{} {}", "PRI:".green(), pri),
                None => println!("{}", "no PRI found".red()),
            }
        }
        Algo::PriTransform => {
            let pt = PRITransform::new(opt.alpha, opt.beta, opt.gamma);
            match pt.run(&toas, (opt.range_lo, opt.range_hi), opt.bin_width) {
                Some(pri) => println!("{} {}", "PRI:".green(), pri),
                None => println!("{}", "no PRI found".red()),
            }
        }
        Algo::Correlation => {
            let pc = PulseCorrelation::new(opt.min_chain, opt.thr);
            match pc.run(&toas, (opt.range_lo, opt.range_hi), opt.bin_width, opt.merge_num) {
                Some((extracted, remaining)) => println!(
                    "{} {:?}\n{} {:?}",
                    "extracted:".green(),
                    extracted,
                    "remaining:".yellow(),
                    remaining
                ),
                None => println!("{}", "no chain found".red()),
            }
        }
        Algo::Search => {
            let pri = opt.pri.expect("--pri is required for the search algorithm");
            let ps = PulseSearcher::new(opt.thr, opt.toler, opt.allow_miss_rate);
            match ps.run(pri, &toas) {
                Some((extracted, remaining)) => println!(
                    "{} {:?}\n{} {:?}",
                    "extracted:".green(),
                    extracted,
                    "remaining:".yellow(),
                    remaining
                ),
                None => println!("{}", "no chain found".red()),
            }
        }
    }

    Ok(())
}
