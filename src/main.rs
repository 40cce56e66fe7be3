use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use env_logger::Env;
use fitgen::{read_image, write_payloads, Error, FirmwareImage, FitSource};
use main_error::MainError;
use structopt::StructOpt;

/// Generate FIT image source for ATF boot chains, with one configuration
/// node per device tree given on the command line.
#[derive(StructOpt)]
struct Opt {
    /// Output its file, default to stdout
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,
    /// Path to the u-boot elf
    #[structopt(short, long, default_value = "./u-boot", parse(from_os_str))]
    uboot: PathBuf,
    /// Path to the bl31 elf
    #[structopt(short, long, default_value = "./bl31.elf", parse(from_os_str))]
    bl31: PathBuf,
    /// Device tree blobs, one config node per blob
    #[structopt(parse(from_os_str), required = true)]
    dtbs: Vec<PathBuf>,
}

fn generate(opt: Opt) -> Result<(), Error> {
    let uboot_data = read_image(&opt.uboot)?;
    let uboot = FirmwareImage::from_data(&uboot_data)?;
    let uboot_load = uboot.load_addr()?;
    log::info!("u-boot load address: 0x{:08x}", uboot_load);

    let bl31_data = read_image(&opt.bl31)?;
    let bl31 = FirmwareImage::from_data(&bl31_data)?;
    let segments = bl31.segments()?;
    log::info!("bl31 loadable segments: {}", segments.len());
    log::trace!("device trees: {:?}", opt.dtbs);

    let fit = FitSource::new(uboot_load, &segments, &opt.dtbs);
    match &opt.output {
        Some(path) => fit.render(&mut File::create(path)?)?,
        None => {
            let stdout = io::stdout();
            fit.render(&mut stdout.lock())?;
        }
    }

    write_payloads(Path::new("."), &segments)?;

    Ok(())
}

#[paw::main]
fn main(args: Opt) -> Result<(), MainError> {
    env_logger::Builder::from_env(Env::default().default_filter_or("fitgen=info"))
        .format_timestamp(None)
        .init();

    generate(args)?;

    Ok(())
}
