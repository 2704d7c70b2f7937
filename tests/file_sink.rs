// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs;
use std::time::Duration;
use std::time::Instant;

use daylog::Level;
use daylog::Logger;
use daylog::sink::rolling::DATE_FORMAT;
use daylog::sink::rolling::file_name;
use jiff::Zoned;
use tempfile::TempDir;

#[test]
fn test_records_land_in_the_daily_file() {
    let temp_dir = TempDir::new().unwrap();
    let logger = Logger::builder()
        .level(Level::Debug)
        .log_dir(temp_dir.path())
        .app_name("gateway")
        .flush_interval(Duration::ZERO)
        .build()
        .unwrap();

    let line = line!() + 1;
    logger.debug("connecting");
    daylog::error!(logger: logger, "connection refused: {}", "10.0.0.7:5432");
    logger.shutdown();

    let today = Zoned::now().strftime(DATE_FORMAT).to_string();
    let path = temp_dir.path().join(file_name("gateway", &today, 0));
    let contents = fs::read_to_string(&path).unwrap();
    let lines = contents.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("[DEBUG]["));
    assert!(lines[0].ends_with(&format!("[file:file_sink.rs line:{line}] connecting")));
    assert!(lines[1].starts_with("[ERROR]["));
    assert!(lines[1].ends_with(&format!(
        "[file:file_sink.rs line:{}] connection refused: 10.0.0.7:5432",
        line + 1
    )));
}

#[test]
fn test_maintenance_sweeps_expired_files() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let expired = ["gateway-2000-01-01.log", "gateway-2000-01-01.log.3"];
    let kept = ["gateway-9999-12-31.log", "other-2000-01-01.log"];
    for name in expired.iter().chain(kept.iter()) {
        fs::write(dir.join(name), b"old\n").unwrap();
    }

    let logger = Logger::builder()
        .log_dir(dir)
        .app_name("gateway")
        .retention_days(7)
        .flush_interval(Duration::from_millis(20))
        .build()
        .unwrap();
    logger.info("started");

    let deadline = Instant::now() + Duration::from_secs(5);
    while expired.iter().any(|name| dir.join(name).exists()) && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(10));
    }
    logger.shutdown();

    for name in expired {
        assert!(!dir.join(name).exists(), "{name} should have been swept");
    }
    for name in kept {
        assert!(dir.join(name).exists(), "{name} should have been kept");
    }

    let today = Zoned::now().strftime(DATE_FORMAT).to_string();
    let active = fs::read_to_string(dir.join(file_name("gateway", &today, 0))).unwrap();
    assert!(active.ends_with(" started\n"));
}
