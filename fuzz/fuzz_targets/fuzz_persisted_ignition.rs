#![no_main]

use kindling::assets::{BootstrapIgnition, BOOTSTRAP_IGN_FILENAME};
use kindling::infrastructure::MemoryFetcher;
use kindling::{File, WritableAsset};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let fetcher = MemoryFetcher::new().with_file(File::new(BOOTSTRAP_IGN_FILENAME, 0o644, data));
    let mut asset = BootstrapIgnition::new();
    if let Ok(true) = asset.load(&fetcher) {
        assert!(asset.config().is_some());
    }
});
