#![no_main]

use kindling::assets::{InstallConfigAsset, INSTALL_CONFIG_FILENAME};
use kindling::infrastructure::MemoryFetcher;
use kindling::{File, WritableAsset};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Any persisted bytes must load or fail with an error, never panic
    let fetcher = MemoryFetcher::new().with_file(File::new(INSTALL_CONFIG_FILENAME, 0o600, data));
    let mut asset = InstallConfigAsset::new();
    let _ = asset.load(&fetcher);
});
