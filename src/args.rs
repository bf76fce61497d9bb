use clap::Parser;

/// This is a multi-criteria ranking program using the TOPSIS method.
///
/// Example: topsis data.csv "1,1,1,1" "+,+,-,+" result.csv
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The table of alternatives, in CSV or Excel format. The first column holds the names of the
    /// alternatives, the other columns are the criteria.
    #[clap(value_parser)]
    pub input: Option<String>,

    /// (list of comma-separated numbers) One weight per criterion, for example "1,1,0.5,2".
    #[clap(value_parser)]
    pub weights: Option<String>,

    /// (list of comma-separated '+' or '-') One impact per criterion, for example "+,+,-,+".
    #[clap(value_parser, allow_hyphen_values = true)]
    pub impacts: Option<String>,

    /// (file path, optional) Where to write the result table. Defaults to result_<input name>.csv next to the
    /// input file.
    #[clap(value_parser)]
    pub result: Option<String>,

    /// (file path, optional) A JSON file describing the analysis. For more information about the file format,
    /// read the manual. Values passed on the command line override the values of this file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) A reference summary in JSON format. If provided, the program checks that the computed summary
    /// matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, a summary of the analysis will be written in JSON format to the
    /// given location.
    #[clap(short, long, value_parser)]
    pub summary: Option<String>,

    /// (csv or xlsx) The type of the input. Deduced from the file extension if not provided.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default: first worksheet) When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
