use structopt::StructOpt;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use servo_sweep::{FatalError, SerialBus, StdinKeys, SweepConfig, SweepDriver};

#[derive(StructOpt)]
#[structopt(name = "servo-sweep")]
struct Args {
    #[structopt(help = "Serial port to use")]
    port: String,
    #[structopt(long, default_value = "1000000", help = "Bus speed in bps")]
    baud_rate: u32,
    #[structopt(
        long,
        use_delimiter = true,
        default_value = "3,4",
        help = "Servo ids to drive"
    )]
    ids: Vec<u8>,
    #[structopt(long, default_value = "0", help = "Lower sweep extreme")]
    min_position: i32,
    #[structopt(long, default_value = "1023", help = "Upper sweep extreme")]
    max_position: i32,
    #[structopt(
        long,
        default_value = "20",
        help = "Goal/present difference treated as settled"
    )]
    settle_threshold: i32,
}

fn main() {
    let args = Args::from_args();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let bus = match SerialBus::open(&args.port, args.baud_rate) {
        Ok(bus) => bus,
        Err(fatal) => fail(fatal),
    };
    info!("opened {} at {} bps", args.port, args.baud_rate);

    let config = SweepConfig {
        ids: args.ids,
        min_position: args.min_position,
        max_position: args.max_position,
        settle_threshold: args.settle_threshold,
    };
    let mut driver = SweepDriver::new(bus, config);
    if let Err(fatal) = driver.run(&mut StdinKeys) {
        drop(driver);
        fail(fatal);
    }
}

fn fail(fatal: FatalError) -> ! {
    error!("{fatal}");
    std::process::exit(fatal.exit_code())
}
