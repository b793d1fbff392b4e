//! Photo gallery grouped by festival year.

use crate::core::api::GalleryImage;

#[derive(Debug, Clone, Default)]
pub struct Gallery {
    images: Vec<GalleryImage>,
    /// Distinct years, newest first.
    years: Vec<i32>,
    year: Option<i32>,
}

impl Gallery {
    pub fn new(images: Vec<GalleryImage>) -> Self {
        let mut years: Vec<i32> = images.iter().map(|img| img.year).collect();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years.dedup();

        let year = years.first().copied();
        Self {
            images,
            years,
            year,
        }
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Select a year. Years without photos are ignored.
    pub fn select_year(&mut self, year: i32) -> bool {
        if self.years.contains(&year) {
            self.year = Some(year);
            true
        } else {
            false
        }
    }

    /// Step through years; `delta > 0` moves to older years.
    pub fn cycle_year(&mut self, delta: isize) {
        if self.years.is_empty() {
            return;
        }
        let current = self
            .year
            .and_then(|y| self.years.iter().position(|&v| v == y))
            .unwrap_or(0);
        let len = self.years.len() as isize;
        let next = (current as isize + delta).rem_euclid(len) as usize;
        self.year = Some(self.years[next]);
    }

    /// Photos of the selected year, in server order.
    pub fn visible(&self) -> Vec<&GalleryImage> {
        match self.year {
            Some(year) => self.images.iter().filter(|img| img.year == year).collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(id: u64, year: i32) -> GalleryImage {
        GalleryImage {
            id,
            image: Some(format!("https://cdn/{id}.jpg")),
            caption: format!("Photo {id}"),
            year,
        }
    }

    #[test]
    fn test_years_descending_and_newest_selected() {
        let gallery = Gallery::new(vec![image(1, 2023), image(2, 2025), image(3, 2023)]);
        assert_eq!(gallery.years(), &[2025, 2023]);
        assert_eq!(gallery.year(), Some(2025));
        assert_eq!(gallery.visible().len(), 1);
    }

    #[test]
    fn test_select_year_filters() {
        let mut gallery = Gallery::new(vec![image(1, 2023), image(2, 2025), image(3, 2023)]);
        assert!(gallery.select_year(2023));
        let ids: Vec<_> = gallery.visible().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(!gallery.select_year(1999));
        assert_eq!(gallery.year(), Some(2023));
    }

    #[test]
    fn test_cycle_wraps() {
        let mut gallery = Gallery::new(vec![image(1, 2024), image(2, 2025)]);
        gallery.cycle_year(1);
        assert_eq!(gallery.year(), Some(2024));
        gallery.cycle_year(1);
        assert_eq!(gallery.year(), Some(2025));
        gallery.cycle_year(-1);
        assert_eq!(gallery.year(), Some(2024));
    }

    #[test]
    fn test_empty_gallery() {
        let mut gallery = Gallery::new(vec![]);
        gallery.cycle_year(1);
        assert_eq!(gallery.year(), None);
        assert!(gallery.visible().is_empty());
    }
}
