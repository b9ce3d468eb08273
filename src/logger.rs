use log::LevelFilter;

const CRATES: [&str; 3] = ["farmboard", "farmboard_data", "farmboard_source"];

pub fn setup(is_debug: bool) -> Result<(), data::log::Error> {
    let level = if is_debug || cfg!(feature = "debug") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut logger = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}:{} -- {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                message
            ))
        })
        .level(LevelFilter::Warn);

    for name in CRATES {
        logger = logger.level_for(name, level);
    }

    logger = logger.chain(data::log::file()?);

    if is_debug {
        logger = logger.chain(std::io::stderr());
    }

    logger.apply()?;
    Ok(())
}
