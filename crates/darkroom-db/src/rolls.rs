//! Roll reference resolution.

use anyhow::Result;
use uuid::Uuid;

use darkroom_types::models::{
    Camera, ChemicalBatch, FilmRoll, FilmRollFields, FilmStock, PopulatedFilmRoll,
};
use darkroom_types::validate::{ValidationError, Violations};

use crate::Database;
use crate::repo::ListFilter;

impl Database {
    /// Resolve the stock, camera and batch ids on each roll into records.
    /// Three batched lookups regardless of how many rolls there are.
    pub fn populate_rolls(&self, owner: Uuid, rolls: Vec<FilmRoll>) -> Result<Vec<PopulatedFilmRoll>> {
        let stock_ids: Vec<Uuid> = rolls.iter().map(|r| r.film_stock).collect();
        let camera_ids: Vec<Uuid> = rolls.iter().filter_map(|r| r.camera).collect();
        let batch_ids: Vec<Uuid> = rolls.iter().filter_map(|r| r.chemical_batch).collect();

        let stocks = self.scoped::<FilmStock>(owner).get_many(&stock_ids)?;
        let cameras = self.scoped::<Camera>(owner).get_many(&camera_ids)?;
        let batches = self.scoped::<ChemicalBatch>(owner).get_many(&batch_ids)?;

        Ok(rolls
            .into_iter()
            .map(|roll| {
                let stock = stocks.get(&roll.film_stock).cloned();
                let camera = roll.camera.and_then(|id| cameras.get(&id).cloned());
                let batch = roll.chemical_batch.and_then(|id| batches.get(&id).cloned());
                PopulatedFilmRoll::new(roll, stock, camera, batch)
            })
            .collect())
    }

    pub fn populate_roll(&self, owner: Uuid, roll: FilmRoll) -> Result<PopulatedFilmRoll> {
        let mut populated = self.populate_rolls(owner, vec![roll])?;
        Ok(populated.remove(0))
    }

    /// Every roll developed in `batch_id`, oldest first, whether or not the
    /// batch itself is soft-deleted. `None` when the batch does not exist for
    /// this owner.
    pub fn rolls_for_batch(&self, owner: Uuid, batch_id: Uuid) -> Result<Option<Vec<PopulatedFilmRoll>>> {
        if self.scoped::<ChemicalBatch>(owner).get(batch_id)?.is_none() {
            return Ok(None);
        }

        let filter = ListFilter::new()
            .eq("chemical_batch_id", batch_id.to_string())
            .order_by("created_at ASC, rowid ASC");
        let rolls = self.scoped::<FilmRoll>(owner).list(&filter)?;

        self.populate_rolls(owner, rolls).map(Some)
    }

    /// Every id a roll write names must be a record the owner holds. A
    /// soft-deleted batch still counts.
    pub fn check_roll_references(
        &self,
        owner: Uuid,
        fields: &FilmRollFields,
    ) -> Result<Option<ValidationError>> {
        let mut v = Violations::new();

        if self.scoped::<FilmStock>(owner).get(fields.film_stock)?.is_none() {
            v.push("filmStock", "Film stock not found");
        }
        if let Some(id) = fields.camera {
            if self.scoped::<Camera>(owner).get(id)?.is_none() {
                v.push("camera", "Camera not found");
            }
        }
        if let Some(id) = fields.chemical_batch {
            if self.scoped::<ChemicalBatch>(owner).get(id)?.is_none() {
                v.push("chemicalBatch", "Chemical batch not found");
            }
        }

        Ok(v.finish(|| ()).err())
    }
}
