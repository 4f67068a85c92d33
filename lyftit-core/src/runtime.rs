use log::debug;
use tokio::runtime::Runtime;
use tokio::sync::OnceCell;

static GLOBAL_RUNTIME: OnceCell<Runtime> = OnceCell::const_new();

/// Runtime hosting store work for callers that are not running inside tokio,
/// such as the mobile bindings. Built on first use.
pub async fn global_runtime() -> std::io::Result<&'static Runtime> {
    GLOBAL_RUNTIME
        .get_or_try_init(|| async {
            let threads = std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(2);
            let threads = std::cmp::max(threads, 2);
            debug!("Initializing global runtime with {} threads", threads);
            tokio::runtime::Builder::new_multi_thread()
                .worker_threads(threads)
                .enable_all()
                .build()
        })
        .await
}
