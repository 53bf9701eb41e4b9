fn main() {
    plait::cli::run();
}
