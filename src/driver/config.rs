use super::error::DriverError;
use clap::{ArgAction, ArgGroup, Parser};
use std::io::{Read, Write};

#[derive(Parser, Debug, Clone, Default)]
#[command(
    version,
    about = "Type checks a Java subset and lowers it to three-address code",
    long_about = None
)]
#[clap(group(ArgGroup::new("input").args(&["file", "inline", "stdin"])))]
pub struct Config {
    /// Output the three-address code to stdout, or to a file if provided
    #[clap(short = 'r', long = "ir_output")]
    pub ir_output_path: Option<Option<String>>,

    /// Print the reduced productions after the code
    #[clap(short, long)]
    pub trace: bool,

    /// Raise log verbosity, repeat for more
    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Optionally read program as an arg
    #[clap(short, long, conflicts_with_all = &["file", "stdin"])]
    pub inline: Option<String>,

    /// Optionally read program from stdin
    #[clap(short, long, conflicts_with_all = &["file", "inline"])]
    pub stdin: bool,

    /// Source file to compile
    pub file: Option<String>,

    // only meant to be used by tests in order to redirect every output,
    // diagnostics included, into one file
    #[clap(skip)]
    pub __output_override: Option<String>,
}

impl Config {
    pub fn get_source_path(&self) -> Option<String> {
        self.file.clone()
    }

    pub fn get_output(&self) -> Result<Box<dyn Write>, DriverError> {
        let path = match (&self.__output_override, &self.ir_output_path) {
            (Some(path), _) | (None, Some(Some(path))) => path,
            _ => return Ok(Box::new(std::io::stdout())),
        };

        let file = std::fs::File::create(path).map_err(|source| DriverError::Write {
            path: path.clone(),
            source,
        })?;

        Ok(Box::new(file))
    }

    pub fn get_script(&mut self) -> Result<String, DriverError> {
        if let Some(inline) = self.inline.take() {
            return Ok(inline);
        }

        if self.stdin {
            let mut input = String::new();

            std::io::stdin()
                .read_to_string(&mut input)
                .map_err(|source| DriverError::Read {
                    path: "<stdin>".to_string(),
                    source,
                })?;

            return Ok(input);
        }

        if let Some(path) = self.file.as_ref() {
            return std::fs::read_to_string(path).map_err(|source| DriverError::Read {
                path: path.clone(),
                source,
            });
        }

        Err(DriverError::MissingInput)
    }

    pub fn input_provided(&self) -> bool {
        self.inline.is_some() || self.stdin || self.file.is_some()
    }
}

impl TryFrom<Vec<&str>> for Config {
    type Error = String;
    fn try_from(args: Vec<&str>) -> Result<Self, Self::Error> {
        match Config::try_parse_from(args) {
            Ok(config) => Ok(config),
            Err(e) => Err(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ir_output_path_is_optional() {
        let config = Config::try_from(vec!["jtac", "-r", "-i", "class A {}"]).unwrap();

        assert_eq!(config.ir_output_path, Some(None));
        assert_eq!(config.inline.as_deref(), Some("class A {}"));

        let config =
            Config::try_from(vec!["jtac", "A.java", "-r", "out.tac", "-t", "-vv"]).unwrap();

        assert_eq!(config.ir_output_path, Some(Some("out.tac".to_string())));
        assert_eq!(config.get_source_path().as_deref(), Some("A.java"));
        assert!(config.trace);
        assert_eq!(config.verbose, 2);
    }

    #[test]
    fn input_sources_conflict() {
        assert!(Config::try_from(vec!["jtac", "A.java", "-s"]).is_err());
        assert!(Config::try_from(vec!["jtac", "-s", "-i", "class A {}"]).is_err());
    }

    #[test]
    fn missing_input_is_an_error() {
        let mut config = Config::try_from(vec!["jtac"]).unwrap();

        assert!(!config.input_provided());
        assert!(matches!(config.get_script(), Err(DriverError::MissingInput)));
    }
}
