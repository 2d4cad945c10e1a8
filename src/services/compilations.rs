//! Compilation service

use crate::{
    error::AppResult,
    models::compilation::{
        Compilation, CompilationDto, NewCompilationDto, UpdateCompilationRequest,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CompilationsService {
    repository: Repository,
}

impl CompilationsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a compilation; unknown event ids are silently skipped
    pub async fn create(&self, new: &NewCompilationDto) -> AppResult<CompilationDto> {
        let event_ids = new.events.clone().unwrap_or_default();
        let compilation = self
            .repository
            .compilations
            .create(&new.title, new.pinned.unwrap_or(false), &event_ids)
            .await?;
        self.to_dto(compilation).await
    }

    /// Update title, pinned flag or the full event set
    pub async fn update(
        &self,
        id: i64,
        update: &UpdateCompilationRequest,
    ) -> AppResult<CompilationDto> {
        let mut compilation = self.repository.compilations.get_by_id(id).await?;

        if let Some(pinned) = update.pinned {
            compilation.pinned = pinned;
        }
        if let Some(title) = &update.title {
            compilation.title = title.clone();
        }
        self.repository.compilations.save(&compilation).await?;

        if let Some(events) = &update.events {
            self.repository.compilations.replace_events(id, events).await?;
        }

        self.to_dto(compilation).await
    }

    /// Delete a compilation by id
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.repository.compilations.delete(id).await
    }

    /// Public listing, optionally filtered to pinned compilations
    pub async fn list(
        &self,
        pinned: Option<bool>,
        from: Option<i64>,
        size: Option<i64>,
    ) -> AppResult<Vec<CompilationDto>> {
        let (from, size) = super::page_params(from, size);
        let compilations = self.repository.compilations.list(pinned, from, size).await?;

        let mut result = Vec::with_capacity(compilations.len());
        for compilation in compilations {
            result.push(self.to_dto(compilation).await?);
        }
        Ok(result)
    }

    /// Get one compilation by id
    pub async fn get_by_id(&self, id: i64) -> AppResult<CompilationDto> {
        let compilation = self.repository.compilations.get_by_id(id).await?;
        self.to_dto(compilation).await
    }

    async fn to_dto(&self, compilation: Compilation) -> AppResult<CompilationDto> {
        let events = self
            .repository
            .compilations
            .event_details(compilation.id)
            .await?;
        Ok(CompilationDto {
            id: compilation.id,
            pinned: compilation.pinned,
            title: compilation.title,
            events: events.into_iter().map(Into::into).collect(),
        })
    }
}
