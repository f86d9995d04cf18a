//! Shared constants for test infrastructure

// Manifest bodies modelled on builds.hex.pm/builds/otp/<arch>/<variant>/builds.txt
pub const MANIFEST_MIXED_RELEASES: &str = "\
OTP-27.2 4c5a2d9 2024-12-11T10:21:40Z 7d1f0c1e
OTP-26.2.5.4 0a1b2c3 2024-10-04T08:12:01Z 9e8d7c6b
OTP-28.1.1 5f6e7d8 2025-10-01T12:00:00Z 1a2b3c4d
OTP-28.0 9a8b7c6 2025-05-20T15:44:10Z 5e6f7a8b
OTP-28.1 1c2d3e4 2025-09-10T09:30:00Z 9c0d1e2f
";

pub const MANIFEST_PRERELEASES: &str = "\
OTP-27.0 aaaaaaa 2024-05-20T10:00:00Z 11111111
OTP-27.0-rc1 bbbbbbb 2024-02-14T10:00:00Z 22222222
OTP-27.0-rc2 ccccccc 2024-03-20T10:00:00Z 33333333
OTP-27.0-rc3 ddddddd 2024-04-22T10:00:00Z 44444444
";

pub const MANIFEST_MAINT_BRANCHES: &str = "\
OTP-28.0.3 eeeeeee 2025-08-01T10:00:00Z 55555555
maint fffffff 2025-10-13T02:00:00Z 66666666
maint-27 0000000 2025-10-13T02:00:00Z 77777777
maint-28 1111111 2025-10-13T02:00:00Z 88888888
";

pub const MANIFEST_NO_STABLE: &str = "\
OTP-28.0-rc1 2222222 2025-02-12T10:00:00Z 99999999
maint 3333333 2025-10-13T02:00:00Z aaaaaaaa
master 4444444 2025-10-13T02:00:00Z bbbbbbbb
";

pub const AMD64_JAMMY_PATH: &str = "/amd64/ubuntu-22.04/builds.txt";
pub const ARM64_NOBLE_PATH: &str = "/arm64/ubuntu-24.04/builds.txt";
