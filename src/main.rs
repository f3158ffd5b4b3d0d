use perony::{OsmPlatform, OsmStation};

#[tokio::main]
async fn main() -> perony::Result<()> {
    simple_logger::init_with_level(log::Level::Info)?;

    let plk_platforms = perony::load_platforms(perony::PLK_FILE, perony::OTHERS_FILE)?;
    let platform_elements = perony::fetch_platforms().await?;
    let station_elements = perony::fetch_stations().await?;

    let osm_platforms = OsmPlatform::from_elements(&platform_elements);
    let stations = OsmStation::by_name(OsmStation::from_elements(&station_elements));

    let coverage = perony::compare(&plk_platforms, &osm_platforms);
    perony::print_coverage(&coverage);

    let (report, stats) = perony::reconcile(&plk_platforms, &osm_platforms, &stations)?;
    perony::dump_report(&report, perony::REPORT_FILE)?;
    perony::print_stats(&stats);

    Ok(())
}
