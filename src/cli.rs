use clap::Parser;

use crate::properties::PairClass;

#[derive(Parser, Debug, Clone)]
pub struct McConfig {
    /// TOML file with the simulation parameters; defaults are used if empty
    #[arg(long, default_value = "")]
    input: String,
    #[arg(long, default_value = "./out")]
    output_dir: String,
    /// JSON snapshot to start from instead of a lattice
    #[arg(long)]
    resume: Option<String>,
}

impl McConfig {
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn output_dir(&self) -> &str {
        &self.output_dir
    }

    pub fn resume(&self) -> Option<&str> {
        self.resume.as_deref()
    }

    pub fn toml(&self) -> String {
        format!("{}/config.toml", self.output_dir())
    }

    pub fn trajectory(&self) -> String {
        format!("{}/trajectory.xyz", self.output_dir())
    }

    pub fn snapshot(&self) -> String {
        format!("{}/snapshot.json", self.output_dir())
    }

    pub fn geometry(&self) -> String {
        format!("{}/geometry.png", self.output_dir())
    }

    pub fn rdf_plot(&self) -> String {
        format!("{}/rdf.png", self.output_dir())
    }

    pub fn energies(&self) -> String {
        format!("{}/energies.txt", self.output_dir())
    }

    pub fn virials(&self) -> String {
        format!("{}/forces.txt", self.output_dir())
    }

    pub fn num_density(&self, class: PairClass) -> String {
        format!("{}/{}numDensity.txt", self.output_dir(), class.prefix())
    }

    pub fn xy_num_density(&self, class: PairClass) -> String {
        format!("{}/{}xy_numDensity.txt", self.output_dir(), class.prefix())
    }
}
