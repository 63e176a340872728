use crate::Result;
use std::{fs, path::Path};

pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// True when `name` ends with `.jpg`, `.jpeg` or `.png`, ignoring case.
pub fn is_image_file_name(name: &str) -> bool {
    let name = name.to_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .any(|ext| name.strip_suffix(ext).is_some_and(|rest| rest.ends_with('.')))
}

/// Names of the image files directly inside `dir`, sorted.
pub fn list_images(dir: impl AsRef<Path>) -> Result<Vec<String>> {
    let mut names = vec![];

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        // Follows symlinks.
        if !entry.path().is_file() {
            continue;
        }

        if let Some(name) = entry.file_name().to_str()
            && is_image_file_name(name)
        {
            names.push(name.to_string());
        }
    }

    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_is_image_file_name() {
        assert!(is_image_file_name("a.jpg"));
        assert!(is_image_file_name("a.JPEG"));
        assert!(is_image_file_name("photo.Png"));
        assert!(!is_image_file_name("a.gif"));
        assert!(is_image_file_name(".png"));
        assert!(is_image_file_name("archive.tar.JPG"));
        assert!(!is_image_file_name("jpg"));
        assert!(!is_image_file_name("photojpg"));
        assert!(!is_image_file_name("notes.png.txt"));
    }

    #[test]
    fn test_list_images() -> anyhow::Result<()> {
        let dir = tempdir()?;
        for name in ["b.PNG", "a.jpg", "c.jpeg", "notes.txt", "anim.gif"] {
            fs::write(dir.path().join(name), b"")?;
        }
        fs::create_dir(dir.path().join("folder.jpg"))?;

        assert_eq!(list_images(dir.path())?, ["a.jpg", "b.PNG", "c.jpeg"]);
        Ok(())
    }

    #[test]
    fn test_list_dot_names() -> anyhow::Result<()> {
        let dir = tempdir()?;
        for name in [".png", ".hidden.jpg", ".jpgrc"] {
            fs::write(dir.path().join(name), b"")?;
        }

        assert_eq!(list_images(dir.path())?, [".hidden.jpg", ".png"]);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_list_follows_symlinks() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let target = dir.path().join("real.png");
        fs::write(&target, b"")?;
        std::os::unix::fs::symlink(&target, dir.path().join("link.jpg"))?;
        std::os::unix::fs::symlink(dir.path().join("gone.png"), dir.path().join("dangling.png"))?;

        assert_eq!(list_images(dir.path())?, ["link.jpg", "real.png"]);
        Ok(())
    }

    #[test]
    fn test_list_missing_dir() {
        assert!(list_images("/no/such/imagelab/dir").is_err());
    }
}
