//! End-to-end self test: drives every facade operation in order and
//! prints one tagged line per step.

use anyhow::{anyhow, ensure};
use colored::Colorize;
use ldb_sdk::{Ldb, ObjectiveId, ObjectiveStore};

type StepResult = anyhow::Result<Option<String>>;

#[derive(Debug, Default)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub failed_steps: Vec<String>,
}

pub struct SelfTest<'a, S> {
    ldb: &'a Ldb<S>,
    db: ObjectiveId,
    summary: Summary,
}

impl<'a, S: ObjectiveStore> SelfTest<'a, S> {
    pub fn new(ldb: &'a Ldb<S>, db: ObjectiveId) -> Self {
        Self {
            ldb,
            db,
            summary: Summary::default(),
        }
    }

    pub fn run(mut self) -> Summary {
        self.step("newDB", |l, db| {
            l.create_database(db)?;
            Ok(None)
        });
        self.step("showDB", |l, db| {
            l.show_database(db);
            ensure!(l.shown_database().as_ref() == Some(db), "database is not displayed");
            Ok(None)
        });
        self.step("addToKey", |l, db| {
            l.add_to(db, "testKey00", 1)?;
            Ok(None)
        });
        self.step("setKey+", |l, db| {
            l.set(db, "testKey01", 2_147_483_647)?;
            Ok(None)
        });
        self.step("setKey-", |l, db| {
            l.set(db, "testKey02", -2_147_483_647)?;
            Ok(None)
        });
        self.step("getDB", |l, db| {
            ensure!(l.database_exists(db)?, "database missing");
            Ok(None)
        });
        self.step("getKeyValue", |l, db| {
            let value = l
                .get(db, "testKey00")?
                .ok_or_else(|| anyhow!("testKey00 has no value"))?;
            Ok(Some(format!("testKey00: {value}")))
        });
        self.step("getKey", |l, db| {
            let (key, value) = l
                .get_entry(db, "testKey00")?
                .ok_or_else(|| anyhow!("testKey00 not found"))?;
            Ok(Some(serde_json::json!({ "key": key, "value": value }).to_string()))
        });
        self.step("getKeys", |l, db| {
            let all: Vec<_> = l
                .list_all(db)?
                .into_iter()
                .map(|(key, value)| serde_json::json!({ "key": key, "value": value }))
                .collect();
            Ok(Some(format!("\n{}\n", serde_json::to_string_pretty(&all)?)))
        });
        self.step("getKeyFromAllKeys", |l, db| {
            let found = l
                .list_all(db)?
                .into_iter()
                .find(|(key, _)| key == "testKey00")
                .ok_or_else(|| anyhow!("testKey00 not listed"))?;
            Ok(Some(format!("{found:?}")))
        });
        self.step("setArray00", |l, db| {
            l.set_array(db, "testArray00", &["Red"])?;
            ensure!(
                l.get_array::<String>(db, "testArray00")? == Some(vec!["Red".to_string()]),
                "testArray00 did not read back"
            );
            Ok(None)
        });
        self.step("setArray01", |l, db| {
            l.set_array(db, "testArray01", &["foo", "bar"])?;
            Ok(None)
        });
        self.step("appendArray", |l, db| {
            l.set_array(db, "testArray00", &["Red", "Blue"])?;
            let got = l.get_array::<String>(db, "testArray00")?;
            ensure!(
                got == Some(vec!["Red".to_string(), "Blue".to_string()]),
                "testArray00 read back as {got:?}"
            );
            Ok(None)
        });
        self.step("removeKey", |l, db| {
            for key in ["testKey00", "testKey01", "testKey02"] {
                l.remove(db, key)?;
            }
            Ok(None)
        });
        self.step("removeArray", |l, db| {
            l.remove_array(db, "testArray00")?;
            l.remove_array(db, "testArray01")?;
            let left = l.list_all(db)?;
            ensure!(left.is_empty(), "entries left behind: {left:?}");
            Ok(None)
        });
        self.step("hideDB", |l, db| {
            let cleared = l.hide_database();
            ensure!(cleared.as_ref() == Some(db), "hid {cleared:?}");
            Ok(None)
        });
        self.step("removeDB", |l, db| {
            l.remove_database(db)?;
            ensure!(!l.database_exists(db)?, "database still exists");
            Ok(None)
        });
        self.summary
    }

    fn step<F>(&mut self, id: &str, f: F)
    where
        F: FnOnce(&Ldb<S>, &ObjectiveId) -> StepResult,
    {
        match f(self.ldb, &self.db) {
            Ok(note) => {
                self.summary.passed += 1;
                println!("{}", success_line(id, self.db.as_str(), note.as_deref()));
            }
            Err(e) => {
                self.summary.failed += 1;
                self.summary.failed_steps.push(id.to_string());
                println!("{}", failure_line(id, self.db.as_str(), &e.to_string()));
            }
        }
    }
}

fn prefix(id: &str, db: &str, note: Option<&str>) -> String {
    let note = note.map(|n| format!(" {n} :")).unwrap_or_default();
    format!("{} : {} : {} :{}", "DataBase".cyan(), id.yellow(), db.bright_yellow(), note)
}

fn success_line(id: &str, db: &str, note: Option<&str>) -> String {
    format!("{} {}", prefix(id, db, note), "Successfully Ran.".green())
}

fn failure_line(id: &str, db: &str, error: &str) -> String {
    format!("{} {}\nERROR: {}", prefix(id, db, None), "Failed To Run.".red(), error)
}
