fn main() {
    propwrap::cli::run();
}
