//! 领域记录到响应类型的转换。

use classroom_api_types::{
    AssignmentDetailsResponse, AssignmentResponse, AssignmentReviewResponse, ClassListItem,
    ClassOverviewResponse, ClassResponse, EnrolledUser, EnrollmentResponse, MaterialNode,
    MaterialResponse, ModuleNode, ModuleResponse, NotEnrolledUser, ProgressResponse,
    SubmissionResponse, SubmitterResponse, TeacherClassSummary, TrackModuleResponse, UserResponse,
    VisibilityResponse,
};
use classroom_core::domain::{ClassId, Progress};

use crate::repository::{
    AssignmentRecord, ClassRecord, ClassTotals, EnrolledUserRecord, EnrollmentRecord,
    MaterialRecord, MaterialTree, ModuleRecord, SubmissionRecord, SubmitterRecord, UserRecord,
};
use crate::service::{
    AssignmentDetails, AssignmentReview, ClassListing, ClassOverview, TrackedModule,
};

impl From<ClassRecord> for ClassResponse {
    fn from(class: ClassRecord) -> Self {
        Self {
            id: class.id.value(),
            creator_class_id: class.owner_id.into_inner(),
            title: class.title,
            description: class.description,
            image: class.image,
            video: class.video,
            status: class.status,
            created_at: class.created_at,
            updated_at: class.updated_at,
        }
    }
}

impl From<ClassRecord> for VisibilityResponse {
    fn from(class: ClassRecord) -> Self {
        Self {
            id: class.id.value(),
            title: class.title,
            status: class.status,
        }
    }
}

impl From<ClassListing> for ClassListItem {
    fn from(listing: ClassListing) -> Self {
        Self {
            class: listing.class.into(),
            enrollment_status: listing.enrollment_status,
            progress: listing.progress,
        }
    }
}

impl From<ClassTotals> for TeacherClassSummary {
    fn from(totals: ClassTotals) -> Self {
        let class = totals.class;
        Self {
            id: class.id.value(),
            title: class.title,
            description: class.description,
            status: class.status,
            created_at: class.created_at,
            updated_at: class.updated_at,
            materials_total: totals.materials_total,
            modules_total: totals.modules_total,
            student_enrolled_total: totals.student_enrolled_total,
        }
    }
}

impl From<EnrollmentRecord> for EnrollmentResponse {
    fn from(record: EnrollmentRecord) -> Self {
        Self {
            user_id: record.user_id.into_inner(),
            class_id: record.class_id.value(),
            enrollment_status: record.status,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

impl From<EnrolledUserRecord> for EnrolledUser {
    fn from(record: EnrolledUserRecord) -> Self {
        Self {
            user_id: record.user_id.into_inner(),
            name: record.name,
        }
    }
}

impl From<UserRecord> for NotEnrolledUser {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id.into_inner(),
            name: user.name,
            email: user.email,
            image_url: user.image_url,
        }
    }
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id.into_inner(),
            name: user.name,
            email: user.email,
            image_url: user.image_url,
            role: user.role,
        }
    }
}

impl From<TrackedModule> for TrackModuleResponse {
    fn from(tracked: TrackedModule) -> Self {
        let percentage = tracked.percentage();
        let record = tracked.record;
        Self {
            user_id: record.user_id.into_inner(),
            class_id: record.class_id.value(),
            material_id: record.material_id.value(),
            module_id: record.module_id.value(),
            status: record.status,
            progress: percentage,
            completed_modules: tracked.progress.completed(),
            total_modules: tracked.progress.total(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

pub fn progress_response(class_id: ClassId, progress: Progress) -> ProgressResponse {
    ProgressResponse {
        class_id: class_id.value(),
        progress: progress.percentage(),
        completed_modules: progress.completed(),
        total_modules: progress.total(),
    }
}

impl From<MaterialRecord> for MaterialResponse {
    fn from(material: MaterialRecord) -> Self {
        Self {
            id: material.id.value(),
            class_id: material.class_id.value(),
            creator_materials_id: material.creator_id.into_inner(),
            title: material.title,
            created_at: material.created_at,
            updated_at: material.updated_at,
        }
    }
}

impl From<ModuleRecord> for ModuleResponse {
    fn from(module: ModuleRecord) -> Self {
        Self {
            id: module.id.value(),
            materials_id: module.material_id.value(),
            title: module.title,
            content: module.content,
            attachments: module.attachments,
            videos: module.videos,
            created_at: module.created_at,
            updated_at: module.updated_at,
        }
    }
}

impl From<ModuleRecord> for ModuleNode {
    fn from(module: ModuleRecord) -> Self {
        Self {
            id: module.id.value(),
            title: module.title,
            content: module.content,
            attachments: module.attachments,
            videos: module.videos,
        }
    }
}

impl From<MaterialTree> for MaterialNode {
    fn from(tree: MaterialTree) -> Self {
        Self {
            id: tree.material.id.value(),
            title: tree.material.title,
            modules: tree.modules.into_iter().map(ModuleNode::from).collect(),
        }
    }
}

impl From<ClassOverview> for ClassOverviewResponse {
    fn from(overview: ClassOverview) -> Self {
        Self {
            class: overview.class.into(),
            enrollment_status: overview.enrollment_status,
            progress: overview.progress,
            materials: overview
                .materials
                .into_iter()
                .map(MaterialNode::from)
                .collect(),
        }
    }
}

impl From<AssignmentRecord> for AssignmentResponse {
    fn from(assignment: AssignmentRecord) -> Self {
        Self {
            id: assignment.id.value(),
            class_id: assignment.class_id.value(),
            creator_assignment_id: assignment.creator_id.into_inner(),
            title: assignment.title,
            description: assignment.description,
            due_date: assignment.due_date,
            created_at: assignment.created_at,
            updated_at: assignment.updated_at,
        }
    }
}

impl From<SubmissionRecord> for SubmissionResponse {
    fn from(submission: SubmissionRecord) -> Self {
        Self {
            id: submission.id.value(),
            assignment_id: submission.assignment_id.value(),
            student_id: submission.student_id.into_inner(),
            link: submission.link,
            status: submission.status,
            grade: submission.grade.map(u16::from),
            feedback: submission.feedback,
            submitted_at: submission.submitted_at,
            graded_at: submission.graded_at,
        }
    }
}

impl From<AssignmentDetails> for AssignmentDetailsResponse {
    fn from(details: AssignmentDetails) -> Self {
        Self {
            assignment: details.assignment.into(),
            submission: details.submission.map(SubmissionResponse::from),
        }
    }
}

impl From<SubmitterRecord> for SubmitterResponse {
    fn from(record: SubmitterRecord) -> Self {
        let submission = record.submission;
        Self {
            submission_id: submission.id.value(),
            student_id: submission.student_id.into_inner(),
            name: record.student_name,
            image: record.student_image,
            status: submission.status,
            grade: submission.grade.map(u16::from),
            submitted_at: submission.submitted_at,
        }
    }
}

impl From<AssignmentReview> for AssignmentReviewResponse {
    fn from(review: AssignmentReview) -> Self {
        let submissions: Vec<SubmitterResponse> = review
            .submissions
            .into_iter()
            .map(SubmitterResponse::from)
            .collect();
        Self {
            assignment: review.assignment.into(),
            total: submissions.len(),
            submissions,
        }
    }
}
