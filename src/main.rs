fn main() -> Result<(), eframe::Error> {
    // Set up logging for development
    env_logger::init();

    // Run the glob editor application
    glob_editor::run_app()
}
