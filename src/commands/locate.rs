use anyhow::Result;
use std::path::PathBuf;

use crate::fetch::Fetcher;
use crate::package::PackageSpec;
use crate::runtime::Runtime;

use super::context::Workspace;

/// Print the install folder of each requested package, one per line
#[tracing::instrument(skip(runtime, config_path))]
pub fn locate<R: Runtime>(
    runtime: R,
    specs: &[PackageSpec],
    config_path: Option<PathBuf>,
) -> Result<()> {
    let workspace = Workspace::new(runtime, config_path)?;
    for path in run(&workspace, specs)? {
        println!("{}", path.display());
    }
    Ok(())
}

/// Resolve every spec before printing anything; the first failure wins.
pub(crate) fn run<R: Runtime, F: Fetcher>(
    workspace: &Workspace<R, F>,
    specs: &[PackageSpec],
) -> Result<Vec<PathBuf>> {
    let manager = workspace.manager();
    specs
        .iter()
        .map(|spec| manager.locate(&spec.name, &spec.request()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BpmError;
    use crate::fetch::MockFetcher;
    use crate::runtime::RealRuntime;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn write_installed(root: &Path, name: &str, version: &str, folder: &str) {
        let info = root.join(name).join(version).join(".pkg_info");
        fs::create_dir_all(&info).unwrap();
        fs::write(
            info.join(format!("{}.toml", version)),
            format!(
                "[Install]\ninstall_method = \"git\"\ninstall_url = \"u\"\n\
                 package_src_dir = \"src\"\ninstall_folder = \"{}\"\n",
                folder
            ),
        )
        .unwrap();
    }

    #[test]
    fn test_locate_multiple_packages() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "").unwrap();
        let root = dir.path().join("packages");
        write_installed(&root, "foo", "1.0.0", "foo");
        write_installed(&root, "foo", "1.1.0", "foo");
        write_installed(&root, "bar", "0.3", "lib/bar");
        fs::write(
            root.join("package_list.txt"),
            "\nfoo 1.0.0\nbar 0.3\nfoo 1.1.0",
        )
        .unwrap();

        let workspace =
            Workspace::with_fetcher(RealRuntime, MockFetcher::new(), Some(config_path)).unwrap();
        let specs = vec![
            "foo".parse::<PackageSpec>().unwrap(),
            "foo=1.0.0".parse().unwrap(),
            "bar".parse().unwrap(),
        ];

        assert_eq!(
            run(&workspace, &specs).unwrap(),
            vec![
                root.join("foo/1.1.0/foo"),
                root.join("foo/1.0.0/foo"),
                root.join("bar/0.3/lib/bar"),
            ]
        );
    }

    #[test]
    fn test_locate_fails_on_first_missing() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "").unwrap();

        let workspace =
            Workspace::with_fetcher(RealRuntime, MockFetcher::new(), Some(config_path)).unwrap();
        let specs = vec!["foo=2.0".parse::<PackageSpec>().unwrap()];

        let err = run(&workspace, &specs).unwrap_err();
        assert_eq!(
            BpmError::kind_of(&err),
            Some(&BpmError::PackageNotInstalled {
                package: "foo".into()
            })
        );
    }
}
