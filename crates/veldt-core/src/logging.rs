pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter("trace,veldt_core=debug")
        .init();
}
