//! Interactive menu over a [`Session`]
//!
//! The shell reads one answer per line from any `BufRead` and writes prompts
//! and results to any `Write`. End of input behaves like choosing "Exit".

use std::io::{BufRead, Write};
use std::path::PathBuf;

use tracing::{debug, info};

use crate::app::{
    count_by_continent, extremes_by_population, filter_by_continent, filter_by_range, mean_area,
    mean_population, parse_integer, parse_range, sort, summary, AutoSave, MatchMode,
    NumericField, RawRecord, RecordStore, Session, SkipReason, SortField,
};
use crate::app::text::normalize;
use crate::cli::display::Renderer;
use crate::config::AppConfig;
use crate::errors::Result;

const NO_DATA: &str = "[INFO] No data loaded. Use option 1 first.";
const INVALID_OPTION: &str = "[ERROR] Invalid option. Try again.";

/// Distinct continents for selection lists
///
/// Spellings that differ only by case collapse into the first one seen; the
/// result is ordered by case-folded text.
pub fn continent_choices(store: &RecordStore) -> Vec<String> {
    let mut seen: Vec<(String, String)> = Vec::new();
    for record in store {
        let key = normalize(record.continent());
        if key.is_empty() || seen.iter().any(|(k, _)| *k == key) {
            continue;
        }
        seen.push((key, record.continent().to_string()));
    }
    seen.sort_by(|(a, _), (b, _)| a.cmp(b));
    seen.into_iter().map(|(_, spelling)| spelling).collect()
}

/// Interactive menu loop
pub struct Shell<R, W> {
    session: Session,
    renderer: Renderer,
    default_path: PathBuf,
    input: R,
    output: W,
    closed: bool,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    /// Create a shell with an empty session
    pub fn new(config: &AppConfig, input: R, output: W) -> Self {
        Self::with_session(Session::new(config.data.auto_save), config, input, output)
    }

    /// Create a shell over an existing session
    pub fn with_session(session: Session, config: &AppConfig, input: R, output: W) -> Self {
        Self {
            session,
            renderer: Renderer::from_config(&config.display),
            default_path: config.data.path.clone(),
            input,
            output,
            closed: false,
        }
    }

    /// Consume the shell, returning the session
    pub fn into_session(self) -> Session {
        self.session
    }

    /// Run the main menu until the user exits or input ends
    pub fn run(&mut self) -> Result<()> {
        info!("Interactive shell started");
        while !self.closed {
            self.print_main_menu()?;
            let choice = self.prompt("Choose an option: ")?;
            match choice.as_str() {
                "1" => self.load()?,
                "2" => self.search()?,
                "3" => {
                    let count = self.session.store().count();
                    self.say(&format!("[INFO] Records loaded: {}", count))?;
                }
                "4" => self.filters_menu()?,
                "5" => self.sort_menu()?,
                "6" => self.stats_menu()?,
                "7" => self.add()?,
                "8" => self.save()?,
                "9" => self.update()?,
                "0" => break,
                _ if self.closed => break,
                _ => self.say(INVALID_OPTION)?,
            }
        }
        self.say("Goodbye!")?;
        Ok(())
    }

    fn print_main_menu(&mut self) -> Result<()> {
        writeln!(
            self.output,
            "\n=== COUNTRY REGISTRY ===\n\
             1) Load CSV\n\
             2) Search country by name (partial or exact)\n\
             3) Show number of loaded records\n\
             4) Filters\n\
             5) Sorting\n\
             6) Statistics\n\
             7) Add country\n\
             8) Save changes to CSV\n\
             9) Update country (population and area)\n\
             0) Exit"
        )?;
        Ok(())
    }

    /// Print `label` and read one trimmed line; empty at end of input
    fn prompt(&mut self, label: &str) -> Result<String> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            debug!("End of input reached");
            self.closed = true;
            writeln!(self.output)?;
        }
        Ok(line.trim().to_string())
    }

    fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{}", message)?;
        Ok(())
    }

    fn has_data(&mut self) -> Result<bool> {
        if self.session.store().is_empty() {
            self.say(NO_DATA)?;
            return Ok(false);
        }
        Ok(true)
    }

    fn load(&mut self) -> Result<()> {
        let label = format!(
            "CSV path [Enter for '{}']: ",
            self.default_path.display()
        );
        let answer = self.prompt(&label)?;
        let path = if answer.is_empty() {
            self.default_path.clone()
        } else {
            PathBuf::from(answer)
        };

        match self.session.load(&path) {
            Ok(summary) => self.say(&format!(
                "[OK] Records loaded: {}. Rejected rows skipped: {}.",
                summary.accepted,
                summary.rejected_count()
            )),
            Err(e) => self.say(&format!("[ERROR] {}", e)),
        }
    }

    fn search(&mut self) -> Result<()> {
        if !self.has_data()? {
            return Ok(());
        }
        let query = self.prompt("Name to search (partial or exact): ")?;
        let mode = self.prompt("Mode (P=partial / E=exact) [P/E]: ")?;
        let mode = if mode.eq_ignore_ascii_case("e") {
            MatchMode::Exact
        } else {
            MatchMode::Partial
        };

        let results = self.session.store().find_by_name(&query, mode);
        if results.is_empty() {
            writeln!(self.output, "[INFO] No countries match that search.")?;
            return Ok(());
        }
        writeln!(self.output, "[OK] Found {} match(es):", results.len())?;
        self.renderer.write_records(&mut self.output, &results)?;
        Ok(())
    }

    fn filters_menu(&mut self) -> Result<()> {
        if !self.has_data()? {
            return Ok(());
        }
        while !self.closed {
            writeln!(
                self.output,
                "\n--- Filters ---\n\
                 1) By continent\n\
                 2) By population range\n\
                 3) By area range\n\
                 0) Back"
            )?;
            match self.prompt("Choose an option: ")?.as_str() {
                "0" => break,
                "1" => {
                    let continent = self.choose_continent()?;
                    let store = self.session.store();
                    let results = filter_by_continent(store, &continent);
                    if results.is_empty() {
                        writeln!(self.output, "[INFO] No results for that continent.")?;
                    } else {
                        writeln!(self.output, "[OK] {} result(s):", results.len())?;
                        self.renderer.write_records(&mut self.output, &results)?;
                    }
                }
                "2" => self.range_filter(
                    NumericField::Population,
                    "Population range (e.g. 1_000_000-5_000_000, >=2000000, <=800000, 3000000): ",
                )?,
                "3" => self.range_filter(
                    NumericField::Area,
                    "Area range in km² (e.g. 500000-2000000, >=1000000, <=800000, 300000): ",
                )?,
                _ if self.closed => break,
                _ => self.say(INVALID_OPTION)?,
            }
        }
        Ok(())
    }

    fn range_filter(&mut self, field: NumericField, label: &str) -> Result<()> {
        let answer = self.prompt(label)?;
        let Some(range) = parse_range(&answer) else {
            return self.say("[ERROR] Invalid range format.");
        };

        let results = filter_by_range(self.session.store(), field, range);
        if results.is_empty() {
            writeln!(self.output, "[INFO] No results for that {} range.", field)?;
            return Ok(());
        }
        writeln!(self.output, "[OK] {} result(s):", results.len())?;
        self.renderer.write_records(&mut self.output, &results)?;
        Ok(())
    }

    /// Pick a continent from the loaded values, or type one
    fn choose_continent(&mut self) -> Result<String> {
        let options = continent_choices(self.session.store());
        if options.is_empty() {
            return self.prompt("Continent: ");
        }

        writeln!(self.output, "\nSelect continent:")?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "{}) {}", i + 1, option)?;
        }
        let other = options.len() + 1;
        writeln!(self.output, "{}) Other (type it)", other)?;

        while !self.closed {
            let answer = self.prompt(&format!("Option [1-{}]: ", other))?;
            match answer.parse::<usize>() {
                Ok(n) if (1..other).contains(&n) => return Ok(options[n - 1].clone()),
                Ok(n) if n == other => return self.prompt("Continent: "),
                _ if self.closed => break,
                _ => self.say(INVALID_OPTION)?,
            }
        }
        Ok(String::new())
    }

    fn sort_menu(&mut self) -> Result<()> {
        if !self.has_data()? {
            return Ok(());
        }
        while !self.closed {
            writeln!(self.output, "\n--- Sorting ---")?;
            for (i, field) in SortField::ALL.iter().enumerate() {
                writeln!(self.output, "{}) By {}", i + 1, field)?;
            }
            writeln!(self.output, "0) Back")?;

            let choice = self.prompt("Choose an option: ")?;
            if choice == "0" || self.closed {
                break;
            }
            let selected = choice
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| SortField::ALL.get(i).copied());
            let Some(field) = selected else {
                self.say(INVALID_OPTION)?;
                continue;
            };

            let direction = self.prompt("Order (A = ascending, D = descending) [A/D]: ")?;
            let descending = direction.eq_ignore_ascii_case("d");
            let sorted = sort(self.session.store(), field, descending);
            writeln!(
                self.output,
                "[OK] Sorted by {} ({}):",
                field,
                if descending { "desc" } else { "asc" }
            )?;
            self.renderer.write_records(&mut self.output, &sorted)?;
        }
        Ok(())
    }

    fn stats_menu(&mut self) -> Result<()> {
        if !self.has_data()? {
            return Ok(());
        }
        while !self.closed {
            writeln!(
                self.output,
                "\n--- Statistics ---\n\
                 1) Most and least populated country\n\
                 2) Mean population\n\
                 3) Mean area (km²)\n\
                 4) Countries per continent\n\
                 5) Full summary\n\
                 0) Back"
            )?;
            match self.prompt("Choose an option: ")?.as_str() {
                "0" => break,
                "1" => {
                    if let Some(extremes) = extremes_by_population(self.session.store()) {
                        writeln!(self.output, "[OK] Most populated:")?;
                        writeln!(self.output, "{}", self.renderer.record_line(extremes.max))?;
                        writeln!(self.output, "[OK] Least populated:")?;
                        writeln!(self.output, "{}", self.renderer.record_line(extremes.min))?;
                    }
                }
                "2" => {
                    if let Some(mean) = mean_population(self.session.store()) {
                        let mean = self.renderer.mean(mean);
                        self.say(&format!("[OK] Mean population: {}", mean))?;
                    }
                }
                "3" => {
                    if let Some(mean) = mean_area(self.session.store()) {
                        let mean = self.renderer.mean(mean);
                        self.say(&format!("[OK] Mean area (km²): {}", mean))?;
                    }
                }
                "4" => {
                    let counts = count_by_continent(self.session.store());
                    writeln!(self.output, "[OK] Countries per continent:")?;
                    self.renderer.write_counts(&mut self.output, &counts)?;
                }
                "5" => {
                    if let Some(stats) = summary(self.session.store()) {
                        self.renderer.write_summary(&mut self.output, &stats)?;
                    }
                }
                _ if self.closed => break,
                _ => self.say(INVALID_OPTION)?,
            }
        }
        Ok(())
    }

    fn add(&mut self) -> Result<()> {
        if !self.has_data()? {
            return Ok(());
        }
        writeln!(self.output, "\n--- Add country ---")?;
        let name = self.prompt("Name: ")?;
        let population = self.prompt("Population (whole number >= 0): ")?;
        let area = self.prompt("Area in km² (whole number > 0): ")?;
        let continent = self.choose_continent()?;

        let raw = RawRecord::new(name, population, area, continent);
        match self.session.add(&raw) {
            Ok(outcome) => {
                self.say(&format!(
                    "[OK] Country added: {} (Continent: {})",
                    raw.name.trim(),
                    raw.continent.trim()
                ))?;
                self.report_auto_save(outcome)
            }
            Err(e) => self.say(&format!("[ERROR] {}", e)),
        }
    }

    fn save(&mut self) -> Result<()> {
        if !self.has_data()? {
            return Ok(());
        }
        match self.session.save() {
            Ok(path) => self.say(&format!("[OK] Changes saved to {}", path.display())),
            Err(e) => self.say(&format!("[ERROR] {}", e)),
        }
    }

    fn update(&mut self) -> Result<()> {
        if !self.has_data()? {
            return Ok(());
        }
        writeln!(self.output, "\n--- Update country ---")?;
        let query = self.prompt("Name to search (partial or exact): ")?;
        if query.is_empty() {
            return self.say("[ERROR] The search cannot be empty.");
        }

        let matches = self.session.store().find_indices(&query, MatchMode::Partial);
        let index = match matches.as_slice() {
            [] => return self.say("[INFO] No countries match that search."),
            [index] => *index,
            indices => match self.pick_match(indices)? {
                Some(index) => index,
                None => return Ok(()),
            },
        };

        if let Some(record) = self.session.record(index) {
            let line = self.renderer.record_line(record);
            writeln!(self.output, "\nCurrent values:\n{}", line)?;
        }

        let Some(population) = self.read_optional_number("New population (Enter = keep current): ")?
        else {
            return Ok(());
        };
        let Some(area) = self.read_optional_number("New area in km² (Enter = keep current): ")?
        else {
            return Ok(());
        };

        match self.session.update(index, population, area) {
            Ok(outcome) => {
                if let Some(record) = self.session.record(index) {
                    let line = self.renderer.record_line(record);
                    writeln!(self.output, "\n[OK] Country updated:\n{}", line)?;
                }
                self.report_auto_save(outcome)
            }
            Err(e) => self.say(&format!("[ERROR] {}", e)),
        }
    }

    /// Let the user choose among several matches by number
    fn pick_match(&mut self, indices: &[usize]) -> Result<Option<usize>> {
        writeln!(self.output, "[OK] Found {} match(es):", indices.len())?;
        for (position, &index) in indices.iter().enumerate() {
            if let Some(record) = self.session.record(index) {
                let line = self.renderer.record_line(record);
                writeln!(self.output, "{}) {}", position + 1, line.trim_start_matches("- "))?;
            }
        }

        let answer = self.prompt(&format!("Choose number [1-{}]: ", indices.len()))?;
        match answer.parse::<usize>() {
            Ok(n) if (1..=indices.len()).contains(&n) => Ok(Some(indices[n - 1])),
            Ok(_) => {
                self.say("[ERROR] Option out of range.")?;
                Ok(None)
            }
            Err(_) => {
                self.say("[ERROR] Enter a valid number.")?;
                Ok(None)
            }
        }
    }

    /// `Some(None)` keeps the current value; `None` aborts after an error message
    fn read_optional_number(&mut self, label: &str) -> Result<Option<Option<i64>>> {
        let answer = self.prompt(label)?;
        if answer.is_empty() {
            return Ok(Some(None));
        }
        match parse_integer(&answer) {
            Some(value) => Ok(Some(Some(value))),
            None => {
                self.say("[ERROR] Enter a whole number.")?;
                Ok(None)
            }
        }
    }

    fn report_auto_save(&mut self, outcome: AutoSave) -> Result<()> {
        match outcome {
            AutoSave::Saved(path) => self.say(&format!("[OK] Changes saved to {}", path.display())),
            AutoSave::Skipped(SkipReason::Disabled) => {
                self.say("[INFO] Auto-save is disabled. Use option 8 to save.")
            }
            AutoSave::Skipped(SkipReason::NoSource) => {
                self.say("[INFO] No CSV path associated yet. Load a file with option 1 first.")
            }
            AutoSave::Failed(e) => self.say(&format!(
                "[ERROR] Auto-save failed: {}. The change is kept in memory.",
                e
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    const SAMPLE: &str = "name,population,area,continent\n\
                          Argentina,45000000,2780400,América\n\
                          Austria,9000000,83879,Europa\n\
                          Australia,26000000,7692024,Oceanía\n\
                          Chile,19000000,756102,AMÉRICA\n";

    fn fixture(auto_save: bool) -> (TempDir, AppConfig) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("countries.csv");
        fs::write(&path, SAMPLE).unwrap();
        let mut config = AppConfig::default();
        config.data.path = path;
        config.data.auto_save = auto_save;
        (dir, config)
    }

    /// Run the shell over scripted answers, returning output and session
    fn drive(config: &AppConfig, script: &str) -> (String, Session) {
        let mut output = Vec::new();
        let mut shell = Shell::new(config, Cursor::new(script.to_string()), &mut output);
        shell.run().unwrap();
        let session = shell.into_session();
        (String::from_utf8(output).unwrap(), session)
    }

    #[test]
    fn test_continent_choices_collapse_case() {
        let (_dir, config) = fixture(false);
        let mut session = Session::new(false);
        session.load(&config.data.path).unwrap();

        assert_eq!(
            continent_choices(session.store()),
            vec!["América", "Europa", "Oceanía"]
        );
    }

    #[test]
    fn test_load_default_path_and_count() {
        let (_dir, config) = fixture(false);
        let (text, session) = drive(&config, "1\n\n3\n0\n");

        assert!(text.contains("[OK] Records loaded: 4. Rejected rows skipped: 0."));
        assert!(text.contains("[INFO] Records loaded: 4"));
        assert!(text.ends_with("Goodbye!\n"));
        assert_eq!(session.store().count(), 4);
    }

    #[test]
    fn test_commands_require_data() {
        let (_dir, config) = fixture(false);
        let (text, _) = drive(&config, "2\n4\n7\n0\n");
        assert_eq!(text.matches(NO_DATA).count(), 3);
    }

    #[test]
    fn test_end_of_input_exits() {
        let (_dir, config) = fixture(false);
        let (text, _) = drive(&config, "1\n\n4\n");
        assert!(text.ends_with("Goodbye!\n"));
    }

    #[test]
    fn test_search_modes() {
        let (_dir, config) = fixture(false);
        let (text, _) = drive(&config, "1\n\n2\naust\nP\n2\naust\nE\n0\n");

        assert!(text.contains("[OK] Found 2 match(es):"));
        assert!(text.contains("- Austria | Population: 9.000.000 | Area: 83.879 km²"));
        assert!(text.contains("[INFO] No countries match that search."));
    }

    #[test]
    fn test_filter_by_chosen_continent_and_range() {
        let (_dir, config) = fixture(false);
        // Filters: continent option 1 (América), then an invalid range, then area <= 100000
        let (text, _) = drive(&config, "1\n\n4\n1\n1\n2\nabc\n3\n<=100_000\n0\n0\n");

        assert!(text.contains("1) América\n2) Europa\n3) Oceanía\n4) Other (type it)"));
        assert!(text.contains("[OK] 2 result(s):"));
        assert!(text.contains("- Chile"));
        assert!(text.contains("[ERROR] Invalid range format."));
        assert!(text.contains("[OK] 1 result(s):\n- Austria"));
    }

    #[test]
    fn test_sort_descending_by_population() {
        let (_dir, config) = fixture(false);
        let (text, _) = drive(&config, "1\n\n5\n2\nD\n0\n0\n");

        let argentina = text.find("- Argentina").unwrap();
        let australia = text.find("- Australia").unwrap();
        let austria = text.find("- Austria").unwrap();
        assert!(text.contains("[OK] Sorted by population (desc):"));
        assert!(argentina < australia && australia < austria);
    }

    #[test]
    fn test_sort_menu_lists_every_field() {
        let (_dir, config) = fixture(false);
        let (text, _) = drive(&config, "1\n\n5\n4\n1\nA\n0\n0\n");

        assert!(text.contains("1) By name\n2) By population\n3) By area\n0) Back"));
        assert!(text.contains(INVALID_OPTION));
        assert!(text.contains("[OK] Sorted by name (asc):\n- Argentina"));
    }

    #[test]
    fn test_stats_menu() {
        let (_dir, config) = fixture(false);
        let (text, _) = drive(&config, "1\n\n6\n1\n4\n0\n0\n");

        assert!(text.contains("[OK] Most populated:\n- Argentina"));
        assert!(text.contains("[OK] Least populated:\n- Austria"));
        assert!(text.contains("  - América: 1\n  - Europa: 1\n  - Oceanía: 1\n  - AMÉRICA: 1"));
    }

    #[test]
    fn test_add_with_typed_continent_auto_saves() {
        let (_dir, config) = fixture(true);
        let (text, session) = drive(&config, "1\n\n7\nFiji\n900_000\n18 274\n4\nOceania\n0\n");

        assert!(text.contains("[OK] Country added: Fiji (Continent: Oceania)"));
        assert!(text.contains("[OK] Changes saved to"));
        assert_eq!(session.store().count(), 5);
        let saved = fs::read_to_string(&config.data.path).unwrap();
        assert!(saved.contains("Fiji,900000,18274,Oceania"));
    }

    #[test]
    fn test_add_rejects_duplicate() {
        let (_dir, config) = fixture(true);
        let (text, session) = drive(&config, "1\n\n7\nCHILE\n1\n1\n1\n0\n");

        assert!(text.contains("[ERROR] A country named 'CHILE' already exists"));
        assert_eq!(session.store().count(), 4);
    }

    #[test]
    fn test_update_picks_among_matches_and_keeps_values() {
        let (_dir, config) = fixture(false);
        // "aus" matches Austria and Australia; pick the second, keep population
        let (text, session) = drive(&config, "1\n\n9\naus\n2\n\n7_700_000\n0\n");

        assert!(text.contains("1) Austria"));
        assert!(text.contains("2) Australia"));
        assert!(text.contains("[OK] Country updated:\n- Australia | Population: 26.000.000 | Area: 7.700.000 km²"));
        assert!(text.contains("[INFO] Auto-save is disabled. Use option 8 to save."));

        let index = session.resolve_single("Australia").unwrap();
        assert_eq!(session.record(index).unwrap().area(), 7_700_000);
        assert_eq!(fs::read_to_string(&config.data.path).unwrap(), SAMPLE);
    }

    #[test]
    fn test_update_rejects_invalid_values() {
        let (_dir, config) = fixture(false);
        let (text, session) = drive(&config, "1\n\n9\nchile\n-5\n\n9\nchile\nmany\n0\n");

        assert!(text.contains("[ERROR] Invalid record: population must be zero or greater"));
        assert!(text.contains("[ERROR] Enter a whole number."));
        let index = session.resolve_single("chile").unwrap();
        assert_eq!(session.record(index).unwrap().population(), 19_000_000);
    }

    #[test]
    fn test_save_writes_file() {
        let (_dir, config) = fixture(false);
        let (text, _) = drive(&config, "1\n\n9\nchile\n20_000_000\n\n8\n0\n");

        assert!(text.contains("[OK] Changes saved to"));
        let saved = fs::read_to_string(&config.data.path).unwrap();
        assert!(saved.contains("Chile,20000000,756102,AMÉRICA"));
    }
}
