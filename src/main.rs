fn main() {
    gitship::app::cli::run();
}
