//! Builders for gzip-compressed tar archives shaped like OTP releases

use flate2::write::GzEncoder;
use flate2::Compression;
use tar::{Builder, EntryType, Header};

/// Archive with `files` (path, contents) below the top-level directory `root`
pub fn release_archive(root: &str, files: &[(&str, &str)]) -> Vec<u8> {
    let mut builder = Builder::new(GzEncoder::new(Vec::new(), Compression::default()));

    let mut dir = Header::new_gnu();
    dir.set_entry_type(EntryType::Directory);
    dir.set_mode(0o755);
    dir.set_size(0);
    dir.set_cksum();
    builder
        .append_data(&mut dir, format!("{}/", root), std::io::empty())
        .unwrap();

    for (path, contents) in files {
        let mut header = Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder
            .append_data(&mut header, format!("{}/{}", root, path), contents.as_bytes())
            .unwrap();
    }

    builder.into_inner().unwrap().finish().unwrap()
}

/// Typical release layout: `bin/erl`, `bin/erlc`, a stdlib beam
pub fn otp_release_archive() -> Vec<u8> {
    release_archive(
        "otp",
        &[
            ("bin/erl", "#!/bin/sh\nexec erlexec \"$@\"\n"),
            ("bin/erlc", "#!/bin/sh\n"),
            ("lib/stdlib-6.0/ebin/lists.beam", "FOR1"),
        ],
    )
}

/// Archive whose entry escapes the extraction directory
pub fn escaping_archive() -> Vec<u8> {
    let mut builder = Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    let contents = b"owned";
    let mut header = Header::new_gnu();
    header.set_size(contents.len() as u64);
    header.set_mode(0o644);
    // set_path refuses `..`, so write the raw name field
    let name = b"otp/../../escaped.txt";
    header.as_old_mut().name[..name.len()].copy_from_slice(name);
    header.set_cksum();
    builder.append(&header, &contents[..]).unwrap();
    builder.into_inner().unwrap().finish().unwrap()
}

/// Archive with a symlink entry at `otp/{at}` pointing to `target`,
/// followed by a file written through it at `otp/{at}/pwned.txt`
pub fn symlinked_archive(at: &str, target: &str) -> Vec<u8> {
    let mut builder = Builder::new(GzEncoder::new(Vec::new(), Compression::default()));

    let mut link = Header::new_gnu();
    link.set_entry_type(EntryType::Symlink);
    link.set_mode(0o777);
    link.set_size(0);
    link.set_path(format!("otp/{}", at)).unwrap();
    // set_link_name refuses some targets, so write the raw field
    link.as_old_mut().linkname[..target.len()].copy_from_slice(target.as_bytes());
    link.set_cksum();
    builder.append(&link, std::io::empty()).unwrap();

    let contents = b"owned";
    let mut file = Header::new_gnu();
    file.set_size(contents.len() as u64);
    file.set_mode(0o644);
    file.set_cksum();
    builder
        .append_data(&mut file, format!("otp/{}/pwned.txt", at), &contents[..])
        .unwrap();

    builder.into_inner().unwrap().finish().unwrap()
}

/// Release whose `bin/erl` is a relative symlink into `lib/erts/bin`
pub fn release_with_internal_symlink() -> Vec<u8> {
    let mut builder = Builder::new(GzEncoder::new(Vec::new(), Compression::default()));

    let contents = b"#!/bin/sh\n";
    let mut file = Header::new_gnu();
    file.set_size(contents.len() as u64);
    file.set_mode(0o755);
    file.set_cksum();
    builder
        .append_data(&mut file, "otp/lib/erts/bin/erl", &contents[..])
        .unwrap();

    let mut link = Header::new_gnu();
    link.set_entry_type(EntryType::Symlink);
    link.set_mode(0o777);
    link.set_size(0);
    builder
        .append_link(&mut link, "otp/bin/erl", "../lib/erts/bin/erl")
        .unwrap();

    builder.into_inner().unwrap().finish().unwrap()
}
